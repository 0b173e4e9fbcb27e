//! Structural model checking.
//!
//! Verifies the internal consistency a backend assumes before it ever sees a
//! model: declared versions are sane, the graph is in topological order, and
//! every value name resolves. The first violation is returned as a
//! [`CheckError`]; nothing is downgraded to a warning.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use crate::{Graph, ModelFile};

/// A structural inconsistency found in a model.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("model declares ir_version {0}; expected >= 1")]
    BadIrVersion(i64),
    #[error("model declares no operator-set imports")]
    NoOpsetImport,
    #[error("duplicate operator-set import for domain '{0}'")]
    DuplicateOpsetDomain(String),
    #[error("operator-set version {version} for domain '{domain}' is not positive")]
    BadOpsetVersion { domain: String, version: i64 },
    #[error("model has no graph")]
    MissingGraph,
    #[error("node '{node}' has an empty op_type")]
    EmptyOpType { node: String },
    #[error(
        "node '{node}' input '{input}' is not a graph input, an initializer, \
         or the output of an earlier node"
    )]
    UnknownInput { node: String, input: String },
    #[error("value '{0}' is produced more than once")]
    DuplicateValue(String),
    #[error("graph output has an empty name")]
    UnnamedOutput,
    #[error("graph output '{0}' is never produced")]
    UnproducedOutput(String),
}

/// Check a parsed model for structural consistency.
///
/// # Errors
///
/// Returns the first [`CheckError`] encountered; the caller decides whether
/// that is fatal. Nothing is swallowed.
pub fn check_model(model: &ModelFile) -> Result<(), CheckError> {
    if model.ir_version < 1 {
        return Err(CheckError::BadIrVersion(model.ir_version));
    }
    if model.opset_imports.is_empty() {
        return Err(CheckError::NoOpsetImport);
    }
    let mut domains = HashSet::new();
    for opset in &model.opset_imports {
        if !domains.insert(opset.domain.as_str()) {
            return Err(CheckError::DuplicateOpsetDomain(opset.domain.clone()));
        }
        if opset.version < 1 {
            return Err(CheckError::BadOpsetVersion {
                domain: opset.domain.clone(),
                version: opset.version,
            });
        }
    }
    let graph = model.graph.as_ref().ok_or(CheckError::MissingGraph)?;
    check_graph(graph)
}

/// Load a model from disk and run [`check_model`] on it.
pub fn check_model_file(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let model = crate::read_file(path)
        .with_context(|| format!("failed to load model {}", path.display()))?;
    check_model(&model).with_context(|| format!("model {} failed validation", path.display()))?;
    Ok(())
}

fn check_graph(graph: &Graph) -> Result<(), CheckError> {
    // Values visible to node inputs: graph inputs, initializers, and the
    // outputs of nodes already seen (topological-order rule).
    let mut known: HashSet<&str> = HashSet::new();
    // Values with a single producer. Initializers are excluded: before IR
    // version 4 they legally shadow a graph input of the same name.
    let mut produced: HashSet<&str> = HashSet::new();

    for input in &graph.inputs {
        if !produced.insert(input.name.as_str()) {
            return Err(CheckError::DuplicateValue(input.name.clone()));
        }
        known.insert(input.name.as_str());
    }
    for init in &graph.initializers {
        known.insert(init.name.as_str());
    }

    for node in &graph.nodes {
        let label = if node.name.is_empty() { &node.op_type } else { &node.name };
        if node.op_type.is_empty() {
            return Err(CheckError::EmptyOpType { node: node.name.clone() });
        }
        for input in &node.inputs {
            // Empty string marks an unused optional input slot.
            if input.is_empty() {
                continue;
            }
            if !known.contains(input.as_str()) {
                return Err(CheckError::UnknownInput {
                    node: label.clone(),
                    input: input.clone(),
                });
            }
        }
        for output in &node.outputs {
            if output.is_empty() {
                continue;
            }
            if !produced.insert(output.as_str()) {
                return Err(CheckError::DuplicateValue(output.clone()));
            }
            known.insert(output.as_str());
        }
    }

    for output in &graph.outputs {
        if output.name.is_empty() {
            return Err(CheckError::UnnamedOutput);
        }
        if !known.contains(output.name.as_str()) {
            return Err(CheckError::UnproducedOutput(output.name.clone()));
        }
    }
    Ok(())
}
