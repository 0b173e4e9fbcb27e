//! Top-level test-run orchestration.
//!
//! A run moves through a small state machine: the skip policy decides
//! whether to execute at all; the generation path synthesizes test data
//! through the backend, verifies it, and archives it; the replay path
//! re-runs a pre-existing test-data directory. Both execution paths finish
//! by removing whatever the backend left at the working location.
//!
//! Failures never trigger retries: load errors, verification mismatches,
//! and filesystem errors all propagate to the caller.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use zooqa_device_probe::CpuCapabilities;
use zooqa_engine_core::InferenceBackend;

use crate::skip::{self, SkipDecision};
use crate::{archive, fsutil};

/// Default name of the directory a backend generates test data into.
pub const DEFAULT_WORK_DIR_NAME: &str = "backend_test_data";

/// Where a run keeps its intermediate and named directories.
///
/// Two runs sharing the same `base_dir` and `work_dir_name` race on the
/// filesystem; give concurrent runs distinct base directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Directory the working and named test-data directories live under.
    pub base_dir: PathBuf,
    /// Name of the backend's scratch directory beneath `base_dir`.
    pub work_dir_name: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { base_dir: PathBuf::from("."), work_dir_name: DEFAULT_WORK_DIR_NAME.to_owned() }
    }
}

impl RunnerConfig {
    /// Config rooted at `base_dir` with the default working-directory name.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), ..Self::default() }
    }

    /// Full path of the backend's scratch directory.
    pub fn work_dir(&self) -> PathBuf {
        self.base_dir.join(&self.work_dir_name)
    }
}

/// Terminal state of a completed (non-failed) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The skip policy ended the run before execution.
    Skipped(String),
    /// Fresh test data was generated, verified, and archived.
    Generated { archive: PathBuf },
    /// A pre-existing test-data directory was replayed successfully.
    Replayed,
}

/// Directory where pre-existing test data for `model_path` conventionally
/// lives: next to the model file itself.
pub fn model_test_data_dir(model_path: &Path) -> PathBuf {
    match model_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Run the backend test for `model_path`, probing the live host's CPU.
///
/// See [`run_backend_with_caps`] for the full contract.
pub fn run_backend(
    backend: &dyn InferenceBackend,
    config: &RunnerConfig,
    model_path: &Path,
    test_data_set: Option<&Path>,
    tar_gz_path: Option<&Path>,
) -> Result<RunOutcome> {
    run_backend_with_caps(
        backend,
        config,
        &zooqa_device_probe::probe_cpu(),
        model_path,
        test_data_set,
        tar_gz_path,
    )
}

/// Run the backend test for `model_path` with an injected capability
/// snapshot.
///
/// With `test_data_set = None`, fresh test data is generated through the
/// backend at the configured working location, verified, renamed to the
/// model's base name, archived to `tar_gz_path` (required on this path),
/// and removed again. Any stale directory at the model's base name is
/// replaced. With `test_data_set = Some(dir)`, the given directory is
/// replayed through the backend; nothing is generated or archived.
///
/// Skip decisions print their reason to stdout and return
/// [`RunOutcome::Skipped`]; they are not errors.
///
/// # Errors
///
/// Model load failures, backend verification mismatches, and filesystem
/// failures propagate. Whatever the outcome of the executed branch, the
/// working directory is removed before this function returns; a cleanup
/// failure on the success path is itself an error.
pub fn run_backend_with_caps(
    backend: &dyn InferenceBackend,
    config: &RunnerConfig,
    caps: &CpuCapabilities,
    model_path: &Path,
    test_data_set: Option<&Path>,
    tar_gz_path: Option<&Path>,
) -> Result<RunOutcome> {
    if let SkipDecision::Skip(reason) = skip::decide(backend, caps, model_path)? {
        println!("{reason}");
        return Ok(RunOutcome::Skipped(reason));
    }

    let result = match test_data_set {
        None => generate_and_archive(backend, config, model_path, tar_gz_path),
        Some(dir) => replay(backend, dir),
    };

    // Fixed final step on both paths: drop whatever the backend left at the
    // working location. A branch failure wins over a cleanup failure.
    let cleanup = fsutil::remove_dir_idempotent(&config.work_dir());
    let outcome = result?;
    cleanup?;
    Ok(outcome)
}

fn generate_and_archive(
    backend: &dyn InferenceBackend,
    config: &RunnerConfig,
    model_path: &Path,
    tar_gz_path: Option<&Path>,
) -> Result<RunOutcome> {
    // Surface load-time failures before any directory work.
    backend
        .load_session(model_path)
        .with_context(|| format!("failed to load model {}", model_path.display()))?;

    let Some(stem) = model_path.file_stem().and_then(|s| s.to_str()).filter(|s| !s.is_empty())
    else {
        let reason = format!("the model path {} has no usable base name", model_path.display());
        println!("{reason}");
        return Ok(RunOutcome::Skipped(reason));
    };

    let tar_gz_path = tar_gz_path
        .ok_or_else(|| anyhow!("tar_gz_path is required when generating test data"))?;

    info!(model = %model_path.display(), backend = backend.name(), "generating test data");
    backend
        .create_test_dir(model_path, &config.base_dir, &config.work_dir_name)
        .with_context(|| format!("test-data generation for {} failed", model_path.display()))?;
    backend
        .run_test_dir(&config.work_dir())
        .context("generated test data failed verification")?;

    let named_dir = config.base_dir.join(stem);
    fsutil::replace_dir(&config.work_dir(), &named_dir)?;

    // The named directory must not outlive the run even when archiving
    // fails; the guard removes it on every exit path.
    let guard = fsutil::RemoveOnDrop::new(&named_dir);
    archive::make_tar_gz(tar_gz_path, &named_dir)?;
    guard.finish()?;

    info!(archive = %tar_gz_path.display(), "test data archived");
    Ok(RunOutcome::Generated { archive: tar_gz_path.to_path_buf() })
}

fn replay(backend: &dyn InferenceBackend, dir: &Path) -> Result<RunOutcome> {
    info!(dir = %dir.display(), backend = backend.name(), "replaying existing test data");
    backend
        .run_test_dir(dir)
        .with_context(|| format!("replay of test data in {} failed", dir.display()))?;
    Ok(RunOutcome::Replayed)
}
