//! Turning raw translator output into normalized modules.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use scour_core::{
    FileRules, GeneratedFile, Strictness, TargetProfile, TranspilationUnit, remove_if_exists,
};
use scour_rewrite::Normalizer;
use tracing::{debug, warn};

use crate::toolchain::Toolchain;

/// Extension of translator output and normalized modules.
pub const MODULE_EXTENSION: &str = "rs";

/// Lint attributes written at the top of every module.
pub fn prologue(strictness: Strictness) -> &'static [&'static str] {
    match strictness {
        Strictness::Lenient => &["#![allow(warnings)]"],
        Strictness::Strict => &[
            "#![allow(non_camel_case_types)]",
            "#![allow(non_snake_case)]",
            "#![allow(non_upper_case_globals)]",
        ],
    }
}

/// A normalized module ready to be written to `<output>/<module>.rs`.
#[derive(Debug, Clone)]
pub struct NormalizedModule {
    path: PathBuf,
    strictness: Strictness,
    body: String,
}

impl NormalizedModule {
    pub fn new(profile: &TargetProfile, module: &str, body: impl Into<String>) -> Self {
        Self {
            path: profile.module_path(module, MODULE_EXTENSION),
            strictness: profile.strictness(),
            body: body.into(),
        }
    }

    /// Normalize raw translator output line by line.
    pub fn from_raw(
        profile: &TargetProfile,
        module: &str,
        raw: &str,
        normalizer: &Normalizer,
    ) -> Self {
        Self::new(profile, module, normalizer.normalize_text(raw))
    }

    /// Path relative to the project root.
    pub fn relative_path(&self) -> &Path {
        &self.path
    }
}

impl GeneratedFile for NormalizedModule {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 128);
        for line in prologue(self.strictness) {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&self.body);
        out
    }
}

/// A module written by [`assemble_unit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledModule {
    pub unit: PathBuf,
    pub module: String,
    /// Written path, relative to the project root
    pub path: PathBuf,
    /// Whether the formatter ran cleanly
    pub formatted: bool,
}

/// Read, normalize, write, delete the raw file, then format.
///
/// Returns `None` when the translator left no output for the unit.
pub fn assemble_unit(
    root: &Path,
    profile: &TargetProfile,
    unit: &TranspilationUnit,
    module: &str,
    normalizer: &Normalizer,
    toolchain: &dyn Toolchain,
) -> Result<Option<AssembledModule>> {
    let raw_path = root.join(unit.raw_output(MODULE_EXTENSION));
    let raw = match std::fs::read_to_string(&raw_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(unit = %unit.source().display(), "translator produced no output");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).wrap_err_with(|| format!("failed to read '{}'", raw_path.display()));
        }
    };

    let normalized = NormalizedModule::from_raw(profile, module, &raw, normalizer);
    normalized.write(root)?;
    remove_if_exists(&raw_path)?;

    let written = normalized.path(root);
    let formatted = match toolchain.format(&written) {
        Ok(output) if output.success => true,
        Ok(output) => {
            warn!(module = %written.display(), output = %output.output.trim(), "formatter failed");
            false
        }
        Err(e) => {
            warn!(module = %written.display(), error = %e, "formatter could not be run");
            false
        }
    };

    debug!(module, path = %written.display(), formatted, "assembled");

    Ok(Some(AssembledModule {
        unit: unit.source().to_path_buf(),
        module: module.to_string(),
        path: normalized.relative_path().to_path_buf(),
        formatted,
    }))
}
