//! Structural model validation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;

/// Check command arguments
#[derive(Args)]
pub struct CheckCommand {
    /// Model file path
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,
}

impl CheckCommand {
    pub fn execute(&self) -> Result<()> {
        zooqa_onnx::check_model_file(&self.model)?;
        println!("{} {}", style("ok").green().bold(), self.model.display());
        Ok(())
    }
}
