//! Model metadata inspection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use zooqa_onnx::ModelFile;

/// Inspect command arguments
#[derive(Args)]
pub struct InspectCommand {
    /// Model file path
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Output the structural summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl InspectCommand {
    pub fn execute(&self) -> Result<()> {
        let model = zooqa_onnx::read_file(&self.model)
            .with_context(|| format!("failed to load model {}", self.model.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&model)?);
            return Ok(());
        }

        println!("{}", style(self.model.display().to_string()).bold());
        println!("  ir_version:  {}", model.ir_version);
        if !model.producer_name.is_empty() {
            println!("  producer:    {} {}", model.producer_name, model.producer_version);
        }
        for opset in &model.opset_imports {
            println!("  opset:       {} v{}", domain_label(&opset.domain), opset.version);
        }
        print_graph_summary(&model);
        Ok(())
    }
}

fn domain_label(domain: &str) -> &str {
    if domain.is_empty() {
        "(default)"
    } else {
        domain
    }
}

fn print_graph_summary(model: &ModelFile) {
    match &model.graph {
        Some(graph) => {
            let name = if graph.name.is_empty() { "(unnamed)" } else { &graph.name };
            println!(
                "  graph {}: {} nodes, {} inputs, {} outputs, {} initializers",
                name,
                graph.nodes.len(),
                graph.inputs.len(),
                graph.outputs.len(),
                graph.initializers.len()
            );
        }
        None => println!("  {}", style("no graph").yellow()),
    }
}
