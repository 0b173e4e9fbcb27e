//! Standalone test-data archiving.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;

use zooqa_runner::archive::make_tar_gz;

/// Archive command arguments
#[derive(Args)]
pub struct ArchiveCommand {
    /// Test-data directory to pack
    #[arg(value_name = "DIR")]
    pub source: PathBuf,

    /// Output archive path (.tar.gz)
    #[arg(value_name = "TAR_GZ")]
    pub output: PathBuf,
}

impl ArchiveCommand {
    pub fn execute(&self) -> Result<()> {
        make_tar_gz(&self.output, &self.source)?;
        println!("{} {}", style("archived").green().bold(), self.output.display());
        Ok(())
    }
}
