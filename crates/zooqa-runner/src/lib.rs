//! Backend test orchestration for ONNX model packages.
//!
//! Given a model file and an [`InferenceBackend`](zooqa_engine_core::InferenceBackend),
//! the runner decides whether execution is meaningful on this host
//! ([`skip`]), generates or replays a test-data directory through the
//! backend, and packages generated data into a relocatable `.tar.gz`
//! ([`archive`]).
//!
//! Everything is synchronous and single-threaded; two runs sharing the same
//! [`RunnerConfig`] working location race on the filesystem and must be
//! serialized by the caller. Runs with distinct `base_dir`s are independent.

pub mod archive;
mod fsutil;
pub mod runner;
pub mod skip;

pub use runner::{
    model_test_data_dir, run_backend, run_backend_with_caps, RunOutcome, RunnerConfig,
    DEFAULT_WORK_DIR_NAME,
};
pub use skip::{SkipDecision, MIN_SUPPORTED_OPSET, QUANTIZED_MODEL_SUFFIXES};
