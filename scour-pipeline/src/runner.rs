//! Pipeline orchestrator.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, bail};
use scour_core::{Strictness, TargetProfile, remove_if_exists};
use scour_manifest::Manifest;
use scour_rewrite::{BuildDescriptor, Normalizer};
use tracing::{info, warn};

use crate::{
    assemble::{AssembledModule, MODULE_EXTENSION, assemble_unit},
    integration::snippet,
    lint::{RoundReport, lint},
    toolchain::Toolchain,
};

/// Runs every selected target through synthesize, translate, assemble, and
/// (for strict targets) the lint rounds.
///
/// Targets run strictly one after another: they share the descriptor file
/// name the translator reads.
///
/// ```ignore
/// let toolchain = SystemToolchain::new(&manifest.tools);
/// let report = Pipeline::new(&manifest, root, &toolchain)
///     .targets(["riscv32imac-unknown-xous-elf"])
///     .run()?;
/// ```
pub struct Pipeline<'a> {
    manifest: &'a Manifest,
    root: PathBuf,
    toolchain: &'a dyn Toolchain,
    normalizer: Normalizer,
    targets: Vec<String>,
    rounds: Option<usize>,
}

impl<'a> Pipeline<'a> {
    pub fn new(manifest: &'a Manifest, root: impl Into<PathBuf>, toolchain: &'a dyn Toolchain) -> Self {
        Self {
            manifest,
            root: root.into(),
            toolchain,
            normalizer: Normalizer::with_discard_calls(&manifest.normalize.discard_calls),
            targets: Vec::new(),
            rounds: None,
        }
    }

    /// Only run these targets. An empty list selects all of them.
    pub fn targets(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Override the round budget from `[project]`.
    pub fn rounds(mut self, rounds: Option<usize>) -> Self {
        self.rounds = rounds;
        self
    }

    fn round_budget(&self) -> usize {
        self.rounds.unwrap_or(self.manifest.project.lint_rounds)
    }

    /// Selected target profiles, in manifest order.
    pub fn selected(&self) -> Result<Vec<&'a TargetProfile>> {
        for id in &self.targets {
            if self.manifest.target(id).is_none() {
                let known: Vec<_> = self.manifest.targets.iter().map(|t| t.target.as_str()).collect();
                bail!("unknown target '{}' (known: {})", id, known.join(", "));
            }
        }

        Ok(self
            .manifest
            .targets
            .iter()
            .filter(|t| self.targets.is_empty() || self.targets.contains(&t.target))
            .collect())
    }

    /// Run the full cycle for every selected target.
    pub fn run(&self) -> Result<PipelineReport> {
        let targets = self
            .selected()?
            .into_iter()
            .map(|profile| self.run_target(profile))
            .collect::<Result<_>>()?;
        Ok(PipelineReport { targets })
    }

    /// Run only the lint rounds against modules already on disk.
    pub fn lint_only(&self) -> Result<PipelineReport> {
        let mut targets = Vec::new();
        for profile in self.selected()? {
            info!(target_id = %profile.target, "linting");
            let rounds = lint(&self.root, profile, self.toolchain, self.round_budget())?;
            targets.push(TargetReport {
                rounds,
                ..TargetReport::new(profile)
            });
        }
        Ok(PipelineReport { targets })
    }

    /// Synthesize the build descriptor for one target.
    pub fn descriptor(&self, profile: &TargetProfile) -> Result<BuildDescriptor> {
        let directory = std::path::absolute(&self.root)
            .wrap_err_with(|| format!("failed to resolve '{}'", self.root.display()))?;
        Ok(BuildDescriptor::synthesize(
            &directory,
            &self.manifest.compiler,
            self.manifest.units(),
            profile,
        ))
    }

    fn run_target(&self, profile: &TargetProfile) -> Result<TargetReport> {
        info!(target_id = %profile.target, strictness = ?profile.strictness(), "processing target");
        let mut report = TargetReport::new(profile);

        // Raw outputs left by an earlier run must never pass for fresh ones.
        for unit in self.manifest.units() {
            remove_if_exists(&self.root.join(unit.raw_output(MODULE_EXTENSION)))?;
        }

        let descriptor = self.descriptor(profile)?;
        let descriptor_path = &self.manifest.project.descriptor;
        descriptor.write(&self.root.join(descriptor_path))?;

        let translated = self.toolchain.translate(&self.root, descriptor_path)?;
        if !translated.success {
            warn!(
                target_id = %profile.target,
                output = %translated.output.trim(),
                "translator exited with an error"
            );
        }

        for (unit, module) in self.manifest.modules() {
            match assemble_unit(
                &self.root,
                profile,
                unit,
                module,
                &self.normalizer,
                self.toolchain,
            )? {
                Some(assembled) => report.modules.push(assembled),
                None => report.missing.push(unit.source().to_path_buf()),
            }
        }

        if profile.strictness() == Strictness::Strict {
            report.rounds = lint(&self.root, profile, self.toolchain, self.round_budget())?;
        }

        report.snippet = snippet(profile, report.modules.iter().map(|m| m.module.as_str()));
        Ok(report)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Outcome of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: String,
    pub output: PathBuf,
    pub strictness: Strictness,
    pub modules: Vec<AssembledModule>,
    /// Units the translator produced nothing for
    pub missing: Vec<PathBuf>,
    pub rounds: Vec<RoundReport>,
    /// Registration snippet for the written modules
    pub snippet: String,
}

impl TargetReport {
    fn new(profile: &TargetProfile) -> Self {
        Self {
            target: profile.target.clone(),
            output: profile.output.clone(),
            strictness: profile.strictness(),
            modules: Vec::new(),
            missing: Vec::new(),
            rounds: Vec::new(),
            snippet: String::new(),
        }
    }

    pub fn applied(&self) -> usize {
        self.rounds.iter().map(|r| r.applied).sum()
    }

    pub fn skipped(&self) -> usize {
        self.rounds.iter().map(|r| r.skipped.len()).sum()
    }
}

/// Outcome of a whole run, one entry per target in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub targets: Vec<TargetReport>,
}
