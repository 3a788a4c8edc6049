//! Run operation - translate, assemble, and lint.

use std::path::Path;

use eyre::{Context, Result};
use scour_manifest::Manifest;
use scour_pipeline::{Pipeline, Toolchain};
use tracing::debug;

use crate::reports::RunReport;

/// Options for the run operation.
pub struct RunOptions<'a> {
    /// Project root the manifest paths are relative to.
    pub root: &'a Path,
    /// Targets to process; empty means all.
    pub targets: &'a [String],
    /// Round budget override.
    pub rounds: Option<usize>,
    /// Skip synthesis, translation, and assembly.
    pub lint_only: bool,
}

/// Execute the run operation.
pub fn run(manifest: &Manifest, toolchain: &dyn Toolchain, opts: RunOptions) -> Result<RunReport> {
    debug!(root = %opts.root.display(), lint_only = opts.lint_only, "starting run");
    let pipeline = Pipeline::new(manifest, opts.root, toolchain)
        .targets(opts.targets)
        .rounds(opts.rounds);

    let report = if opts.lint_only {
        pipeline.lint_only().wrap_err("Lint failed")?
    } else {
        pipeline.run().wrap_err("Pipeline failed")?
    };

    Ok(RunReport {
        lint_only: opts.lint_only,
        targets: report.targets,
    })
}
