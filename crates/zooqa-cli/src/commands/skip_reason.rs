//! Offline skip-rule evaluation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use zooqa_device_probe::probe_cpu;
use zooqa_runner::skip::decide_without_engine;
use zooqa_runner::SkipDecision;

/// Skip-reason command arguments.
///
/// Evaluates the filename and opset rules against this host's CPU. The
/// engine-bound load-only session pass a real run performs for quantized
/// models is not attempted here — this command has no inference backend.
#[derive(Args)]
pub struct SkipReasonCommand {
    /// Model file path
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,
}

impl SkipReasonCommand {
    pub fn execute(&self) -> Result<()> {
        match decide_without_engine(&probe_cpu(), &self.model)? {
            SkipDecision::Skip(reason) => println!("{reason}"),
            SkipDecision::Proceed => {
                println!("proceed: no skip rule matches {}", self.model.display());
            }
        }
        Ok(())
    }
}
