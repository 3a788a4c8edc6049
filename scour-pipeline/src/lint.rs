//! Compile, parse, and patch rounds.

use std::path::{Path, PathBuf};

use eyre::Result;
use scour_core::TargetProfile;
use scour_rewrite::{EditOutcome, WarningKind, parse_diagnostics, patch_dir};
use tracing::{info, warn};

use crate::toolchain::Toolchain;

/// An edit left for manual follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEdit {
    pub file: PathBuf,
    pub line: usize,
    pub kind: WarningKind,
    pub token: String,
    pub reason: String,
}

/// Statistics for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round number
    pub round: usize,
    pub build_succeeded: bool,
    /// Actionable warnings in the compiler output, anywhere
    pub warnings: usize,
    /// Actionable warnings inside the target's output directory
    pub in_scope: usize,
    pub applied: usize,
    pub skipped: Vec<SkippedEdit>,
}

impl RoundReport {
    /// A round that changed nothing; later rounds would see the same output.
    pub fn is_quiet(&self) -> bool {
        self.applied == 0
    }
}

/// Run one round: build, parse, narrow to the output directory, patch.
pub fn lint_round(
    root: &Path,
    profile: &TargetProfile,
    toolchain: &dyn Toolchain,
    round: usize,
) -> Result<RoundReport> {
    let build = toolchain.build(root, &profile.target)?;
    let warnings = parse_diagnostics(&build.output);
    let scoped = warnings.under(&profile.output);

    let patches = patch_dir(root, &profile.output, &scoped)?;

    let mut report = RoundReport {
        round,
        build_succeeded: build.success,
        warnings: warnings.len(),
        in_scope: scoped.len(),
        ..Default::default()
    };

    for patch in &patches {
        report.applied += patch.applied();
        for outcome in &patch.outcomes {
            if let EditOutcome::Skipped {
                line,
                record,
                reason,
            } = outcome
            {
                report.skipped.push(SkippedEdit {
                    file: patch.path.clone(),
                    line: *line,
                    kind: record.kind,
                    token: record.token.clone(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    if !build.success {
        warn!(target_id = %profile.target, round, "build failed");
    }
    if report.in_scope == 0 && report.warnings > 0 {
        warn!(
            target_id = %profile.target,
            round,
            warnings = report.warnings,
            output = %profile.output.display(),
            "no reported warning lies under the output directory"
        );
    }
    info!(
        target_id = %profile.target,
        round,
        warnings = report.in_scope,
        applied = report.applied,
        skipped = report.skipped.len(),
        "lint round finished"
    );

    Ok(report)
}

/// Run `rounds` rounds back to back. Every round re-reads the modules from
/// disk and uses fresh diagnostics.
pub fn lint(
    root: &Path,
    profile: &TargetProfile,
    toolchain: &dyn Toolchain,
    rounds: usize,
) -> Result<Vec<RoundReport>> {
    (1..=rounds)
        .map(|round| lint_round(root, profile, toolchain, round))
        .collect()
}
