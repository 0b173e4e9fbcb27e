//! zooqa command-line interface
//!
//! Offline QA utilities for ONNX model packages: host capability probing,
//! structural model checking, metadata inspection, skip-rule evaluation,
//! and test-data archiving.

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;

use commands::{ArchiveCommand, CheckCommand, InspectCommand, ProbeCommand, SkipReasonCommand};

/// zooqa - QA toolkit for ONNX model packages
#[derive(Parser)]
#[command(name = "zooqa")]
#[command(about = "QA toolkit for ONNX model packages")]
#[command(long_about = r#"
Offline utilities used when curating a model zoo: validate that a model file
is structurally sound, inspect its declared metadata, evaluate whether the
backend test would be skipped on this host, and pack test-data directories
into relocatable archives.

Examples:
  # Structurally validate a model
  zooqa check resnet50.onnx

  # Show metadata and a graph summary
  zooqa inspect resnet50.onnx

  # Would the backend test run here?
  zooqa skip-reason resnet50-int8.onnx

  # Pack generated test data
  zooqa archive resnet50/ resnet50.tar.gz
"#)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show host CPU capabilities relevant to backend testing
    Probe(ProbeCommand),

    /// Structurally validate a model file
    Check(CheckCommand),

    /// Print model metadata and a graph summary
    #[command(alias = "info")]
    Inspect(InspectCommand),

    /// Evaluate the skip rules for a model on this host
    SkipReason(SkipReasonCommand),

    /// Pack a test-data directory into a relocatable .tar.gz
    Archive(ArchiveCommand),
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref());

    let result = match &cli.command {
        Commands::Probe(cmd) => cmd.execute(),
        Commands::Check(cmd) => cmd.execute(),
        Commands::Inspect(cmd) => cmd.execute(),
        Commands::SkipReason(cmd) => cmd.execute(),
        Commands::Archive(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        error!("command failed: {err}");
        for cause in err.chain().skip(1) {
            error!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

/// Route logs through `RUST_LOG` when set; `--log-level` wins over both.
fn setup_logging(level_override: Option<&str>) {
    let filter = match level_override {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}
