//! Check operation - manifest summary.

use std::path::Path;

use scour_manifest::Manifest;

use crate::reports::{CheckReport, TargetSummary};

/// Summarize a manifest that has already passed validation.
pub fn check(manifest: &Manifest, config_path: &Path) -> CheckReport {
    CheckReport {
        config_path: config_path.to_path_buf(),
        descriptor: manifest.project.descriptor.clone(),
        lint_rounds: manifest.project.lint_rounds,
        modules: manifest
            .modules()
            .map(|(unit, module)| (module.to_string(), unit.source().to_path_buf()))
            .collect(),
        targets: manifest
            .targets
            .iter()
            .map(|t| TargetSummary {
                target: t.target.clone(),
                output: t.output.clone(),
                strictness: t.strictness(),
                args: t.args.join(" "),
            })
            .collect(),
    }
}
