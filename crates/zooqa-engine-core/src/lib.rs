//! Contracts between the test orchestrator and inference backends.
//!
//! Provides **traits and pure data types** that describe _what_ a backend
//! must do for model-package testing, without prescribing _how_ it does it.
//! Concrete bindings (ONNX Runtime, a remote executor, a recording mock)
//! live with their owners; the orchestrator in `zooqa-runner` only sees this
//! seam.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Minimal contract for an inference backend used in model-package testing.
///
/// All three operations are fallible and every failure is meaningful to the
/// orchestrator: a failed [`load_session`](InferenceBackend::load_session)
/// means the model does not load or shape inference broke; a failed
/// [`run_test_dir`](InferenceBackend::run_test_dir) means replayed outputs
/// diverged from the recorded expectations.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use anyhow::Result;
/// use zooqa_engine_core::InferenceBackend;
///
/// /// Backend that accepts every model and verifies nothing.
/// struct NullBackend;
///
/// impl InferenceBackend for NullBackend {
///     fn name(&self) -> &str {
///         "null"
///     }
///     fn load_session(&self, _model_path: &Path) -> Result<()> {
///         Ok(())
///     }
///     fn create_test_dir(
///         &self,
///         _model_path: &Path,
///         base_dir: &Path,
///         work_dir_name: &str,
///     ) -> Result<()> {
///         std::fs::create_dir_all(base_dir.join(work_dir_name))?;
///         Ok(())
///     }
///     fn run_test_dir(&self, _dir: &Path) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let backend = NullBackend;
/// assert_eq!(backend.name(), "null");
/// ```
pub trait InferenceBackend: Send + Sync {
    /// Short identifier for logs and archive metadata (e.g. `"ort"`).
    fn name(&self) -> &str;

    /// Construct an inference session for `model_path` and discard it.
    ///
    /// Session construction alone must surface malformed or unsupported
    /// models and exercise shape inference; no tensors are executed.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails to load or shape inference fails.
    fn load_session(&self, model_path: &Path) -> Result<()>;

    /// Synthesize a fresh test-data directory for `model_path` at
    /// `base_dir/work_dir_name`: generated inputs, captured outputs, and
    /// whatever auxiliary files the backend needs to replay them.
    ///
    /// # Errors
    ///
    /// Returns an error on load failure or when the directory cannot be
    /// written. An existing directory at the target is the backend's to
    /// overwrite or reject.
    fn create_test_dir(&self, model_path: &Path, base_dir: &Path, work_dir_name: &str)
        -> Result<()>;

    /// Replay a test-data directory, verifying inference outputs match the
    /// recorded expectations.
    ///
    /// # Errors
    ///
    /// Returns an error on load failure or on any output mismatch. A
    /// mismatch is fatal to the run; the orchestrator never retries.
    fn run_test_dir(&self, dir: &Path) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Backend info
// ---------------------------------------------------------------------------

/// Describes the backend that produced a test-data archive.
///
/// Attached to logs so archives can be traced back to the runtime that
/// generated them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Human-readable backend name (e.g. `"ort"`).
    pub backend_name: String,
    /// Backend/runtime version string, empty when unknown.
    pub backend_version: String,
    /// One-line human-readable summary for logs.
    pub backend_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_info_default_is_empty() {
        let info = BackendInfo::default();
        assert!(info.backend_name.is_empty());
        assert!(info.backend_version.is_empty());
        assert!(info.backend_summary.is_empty());
    }

    #[test]
    fn trait_object_is_usable() {
        struct NullBackend;
        impl InferenceBackend for NullBackend {
            fn name(&self) -> &str {
                "null"
            }
            fn load_session(&self, _model_path: &std::path::Path) -> anyhow::Result<()> {
                Ok(())
            }
            fn create_test_dir(
                &self,
                _model_path: &std::path::Path,
                _base_dir: &std::path::Path,
                _work_dir_name: &str,
            ) -> anyhow::Result<()> {
                Ok(())
            }
            fn run_test_dir(&self, _dir: &std::path::Path) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let backend: Box<dyn InferenceBackend> = Box::new(NullBackend);
        assert_eq!(backend.name(), "null");
        assert!(backend.load_session(std::path::Path::new("x.onnx")).is_ok());
    }
}
