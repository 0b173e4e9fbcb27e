//! Host capability report.

use anyhow::Result;
use clap::Args;
use console::style;

use zooqa_device_probe::probe_cpu;

/// Probe command arguments
#[derive(Args)]
pub struct ProbeCommand {}

impl ProbeCommand {
    pub fn execute(&self) -> Result<()> {
        let caps = probe_cpu();

        println!("{}", style("Host CPU capabilities").bold().cyan());
        println!("  cores:       {}", caps.core_count);
        println!("  avx2:        {}", flag(caps.has_avx2));
        println!("  avx512f:     {}", flag(caps.has_avx512f));
        println!("  avx512vnni:  {}", flag(caps.has_avx512vnni));
        println!("  neon:        {}", flag(caps.has_neon));
        println!();

        if caps.has_avx512vnni {
            println!("int8/qdq quantized models execute faithfully on this host");
        } else {
            println!("int8/qdq quantized models will be skipped on this host");
        }
        Ok(())
    }
}

fn flag(enabled: bool) -> console::StyledObject<&'static str> {
    if enabled {
        style("✓").green()
    } else {
        style("✗").red()
    }
}
