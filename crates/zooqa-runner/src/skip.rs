//! Skip policy for backend test runs.
//!
//! Not every model is worth executing on every host. The rules live in an
//! explicit ordered list ([`rules`]); they are evaluated in sequence and the
//! first match wins, so new rules can be appended without disturbing the
//! established ordering. A skip is an informational early exit, never an
//! error — but a model that fails to *load* while a rule inspects it is an
//! error, never a skip.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

use zooqa_device_probe::CpuCapabilities;
use zooqa_engine_core::InferenceBackend;

/// Filename suffixes marking 8-bit-quantized model variants.
///
/// `-int8` models carry quantized weights directly; `-qdq` models express
/// quantization through explicit QuantizeLinear/DequantizeLinear pairs.
/// Either way, their recorded reference outputs were produced on AVX-512
/// VNNI hardware.
pub const QUANTIZED_MODEL_SUFFIXES: &[&str] = &["-int8.onnx", "-qdq.onnx"];

/// Minimum operator-set version the supported backends implement.
pub const MIN_SUPPORTED_OPSET: i64 = 7;

/// Outcome of the skip policy for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipDecision {
    /// Execute the backend test.
    Proceed,
    /// Skip execution, with a human-readable reason.
    Skip(String),
}

impl SkipDecision {
    pub fn is_skip(&self) -> bool {
        matches!(self, SkipDecision::Skip(_))
    }
}

/// `true` if the file name carries one of the quantized-variant markers.
pub fn is_quantized_variant(model_path: &Path) -> bool {
    let Some(name) = model_path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    QUANTIZED_MODEL_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

struct RuleCtx<'a> {
    /// Absent when evaluating offline (CLI diagnostics): the load-only
    /// session pass of the quantization rule is then not performed.
    backend: Option<&'a dyn InferenceBackend>,
    caps: &'a CpuCapabilities,
    model_path: &'a Path,
}

/// One named skip rule: returns a reason when the rule fires.
struct SkipRule {
    name: &'static str,
    check: fn(&RuleCtx<'_>) -> Result<Option<String>>,
}

/// The rules, in evaluation order. Earlier rules win.
const RULES: &[SkipRule] = &[
    SkipRule { name: "quantized-without-vnni", check: quantized_without_vnni },
    SkipRule { name: "unsupported-opset", check: unsupported_opset },
];

/// Decide whether the backend test for `model_path` should be skipped.
///
/// The capability snapshot is injected so callers (and tests) control what
/// the host looks like; [`decide_host`] probes the live machine.
///
/// # Errors
///
/// Model load failures encountered while evaluating a rule propagate as
/// errors; only a matched rule produces a [`SkipDecision::Skip`].
pub fn decide(
    backend: &dyn InferenceBackend,
    caps: &CpuCapabilities,
    model_path: &Path,
) -> Result<SkipDecision> {
    evaluate(&RuleCtx { backend: Some(backend), caps, model_path })
}

/// [`decide`] with a capability snapshot probed from the live host.
pub fn decide_host(backend: &dyn InferenceBackend, model_path: &Path) -> Result<SkipDecision> {
    decide(backend, &zooqa_device_probe::probe_cpu(), model_path)
}

/// Evaluate the rules without an inference backend.
///
/// Used for offline diagnostics: rule behavior is identical except that the
/// quantization rule reports its condition without performing the
/// engine-bound load-only session pass.
pub fn decide_without_engine(caps: &CpuCapabilities, model_path: &Path) -> Result<SkipDecision> {
    evaluate(&RuleCtx { backend: None, caps, model_path })
}

fn evaluate(ctx: &RuleCtx<'_>) -> Result<SkipDecision> {
    for rule in RULES {
        if let Some(reason) = (rule.check)(ctx)? {
            debug!(rule = rule.name, model = %ctx.model_path.display(), "skip rule matched");
            return Ok(SkipDecision::Skip(reason));
        }
    }
    Ok(SkipDecision::Proceed)
}

fn quantized_without_vnni(ctx: &RuleCtx<'_>) -> Result<Option<String>> {
    if !is_quantized_variant(ctx.model_path) || ctx.caps.has_avx512vnni {
        return Ok(None);
    }
    if let Some(backend) = ctx.backend {
        // Execution is skipped, but shape inference must still hold up:
        // construct a session and discard it. A failure here is an error.
        backend.load_session(ctx.model_path).with_context(|| {
            format!("load-only session for {} failed", ctx.model_path.display())
        })?;
    }
    Ok(Some(format!(
        "skipping backend test for {}: this host lacks the avx512vnni extension its \
         reference outputs were produced with",
        ctx.model_path.display()
    )))
}

fn unsupported_opset(ctx: &RuleCtx<'_>) -> Result<Option<String>> {
    let model = zooqa_onnx::read_file(ctx.model_path)
        .with_context(|| format!("failed to load model {}", ctx.model_path.display()))?;
    let Some(version) = model.first_opset_version() else {
        bail!("model {} declares no operator-set imports", ctx.model_path.display());
    };
    if version < MIN_SUPPORTED_OPSET {
        return Ok(Some(format!(
            "skipping backend test for {}: opset version {version} is below the minimum \
             supported opset {MIN_SUPPORTED_OPSET}",
            ctx.model_path.display()
        )));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantized_marker_detection() {
        assert!(is_quantized_variant(Path::new("models/resnet50-int8.onnx")));
        assert!(is_quantized_variant(Path::new("bert-qdq.onnx")));
        assert!(!is_quantized_variant(Path::new("resnet50.onnx")));
        assert!(!is_quantized_variant(Path::new("resnet50-int8.onnx.bak")));
        assert!(!is_quantized_variant(Path::new("int8.onnx")));
    }

    #[test]
    fn rule_order_puts_quantization_first() {
        assert_eq!(RULES[0].name, "quantized-without-vnni");
        assert_eq!(RULES[1].name, "unsupported-opset");
    }
}
