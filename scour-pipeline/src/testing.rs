//! Test utilities for the pipeline.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    cell::RefCell,
    collections::VecDeque,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};

use crate::toolchain::{ToolOutput, Toolchain};

/// A scripted [`Toolchain`].
///
/// `translate` writes the configured raw outputs under the root and records
/// the descriptor it was handed. `build` pops the next queued compiler output,
/// or returns clean output once the queue is empty. `format` does nothing.
#[derive(Debug, Default)]
pub struct FakeToolchain {
    raw_outputs: Vec<(PathBuf, String)>,
    builds: RefCell<VecDeque<String>>,
    fail_format: bool,
    descriptors: RefCell<Vec<String>>,
    built: RefCell<Vec<String>>,
    formatted: RefCell<Vec<PathBuf>>,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw module the translator "produces", relative to the root.
    pub fn with_raw_output(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.raw_outputs.push((path.into(), content.into()));
        self
    }

    /// Queue compiler outputs, one per build call.
    pub fn with_builds(self, outputs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.builds
            .borrow_mut()
            .extend(outputs.into_iter().map(Into::into));
        self
    }

    pub fn failing_format(mut self) -> Self {
        self.fail_format = true;
        self
    }

    /// Descriptor contents seen by each translate call.
    pub fn descriptors(&self) -> Vec<String> {
        self.descriptors.borrow().clone()
    }

    /// Target of each build call.
    pub fn builds(&self) -> Vec<String> {
        self.built.borrow().clone()
    }

    /// Module path of each format call.
    pub fn formatted(&self) -> Vec<PathBuf> {
        self.formatted.borrow().clone()
    }
}

impl Toolchain for FakeToolchain {
    fn translate(&self, root: &Path, descriptor: &Path) -> Result<ToolOutput> {
        let content = std::fs::read_to_string(root.join(descriptor))
            .wrap_err("descriptor was not written before translation")?;
        self.descriptors.borrow_mut().push(content);

        for (path, raw) in &self.raw_outputs {
            let path = root.join(path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, raw)?;
        }
        Ok(ToolOutput::ok(""))
    }

    fn build(&self, _root: &Path, target: &str) -> Result<ToolOutput> {
        self.built.borrow_mut().push(target.to_string());
        let output = self.builds.borrow_mut().pop_front().unwrap_or_default();
        Ok(ToolOutput::ok(output))
    }

    fn format(&self, module: &Path) -> Result<ToolOutput> {
        self.formatted.borrow_mut().push(module.to_path_buf());
        Ok(ToolOutput {
            success: !self.fail_format,
            output: String::new(),
        })
    }
}

/// Create a scratch project directory containing `files` (path, content).
///
/// The directory will be cleaned up when the returned `TempDir` is dropped.
pub fn scratch_project(files: &[(&str, &str)]) -> Result<tempfile::TempDir> {
    let temp_dir = tempfile::TempDir::new()?;
    for (path, content) in files {
        let path = temp_dir.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
    }
    Ok(temp_dir)
}
