//! Shared test support: a recording mock backend.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};
use zooqa_engine_core::InferenceBackend;

/// One recorded backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LoadSession(PathBuf),
    CreateTestDir(PathBuf),
    RunTestDir(PathBuf),
}

/// Backend double that records calls and fails on demand.
///
/// `create_test_dir` writes a pair of tensor-shaped files into the working
/// directory so the generation path has real contents to rename and archive.
#[derive(Default)]
pub struct MockBackend {
    pub fail_load: bool,
    pub fail_create: bool,
    pub fail_run: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_load() -> Self {
        Self { fail_load: true, ..Self::default() }
    }

    pub fn failing_run() -> Self {
        Self { fail_run: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::LoadSession(_))).count()
    }
}

impl InferenceBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn load_session(&self, model_path: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(Call::LoadSession(model_path.to_path_buf()));
        if self.fail_load {
            bail!("mock session construction failed");
        }
        Ok(())
    }

    fn create_test_dir(
        &self,
        _model_path: &Path,
        base_dir: &Path,
        work_dir_name: &str,
    ) -> Result<()> {
        let dir = base_dir.join(work_dir_name);
        self.calls.lock().unwrap().push(Call::CreateTestDir(dir.clone()));
        if self.fail_create {
            bail!("mock test-data generation failed");
        }
        let data_set = dir.join("test_data_set_0");
        std::fs::create_dir_all(&data_set)?;
        std::fs::write(data_set.join("input_0.pb"), b"mock input tensor")?;
        std::fs::write(data_set.join("output_0.pb"), b"mock output tensor")?;
        Ok(())
    }

    fn run_test_dir(&self, dir: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(Call::RunTestDir(dir.to_path_buf()));
        if self.fail_run {
            bail!("output mismatch in {}", dir.display());
        }
        if !dir.is_dir() {
            bail!("test directory {} does not exist", dir.display());
        }
        Ok(())
    }
}
