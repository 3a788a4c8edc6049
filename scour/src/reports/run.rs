//! Run command report data structures.

use scour_core::Strictness;
use scour_pipeline::TargetReport;

use super::output::{Output, Report};

/// Report data from a run or lint invocation.
#[derive(Debug)]
pub struct RunReport {
    /// Only the lint rounds were executed.
    pub lint_only: bool,
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    /// Total edits applied across all targets.
    pub fn applied(&self) -> usize {
        self.targets.iter().map(TargetReport::applied).sum()
    }

    /// Total warnings left for manual follow-up.
    pub fn skipped(&self) -> usize {
        self.targets.iter().map(TargetReport::skipped).sum()
    }
}

fn mode(strictness: Strictness) -> &'static str {
    match strictness {
        Strictness::Strict => "strict",
        Strictness::Lenient => "lenient",
    }
}

fn plural(n: usize, word: &str) -> String {
    format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
}

impl Report for RunReport {
    fn render(&self, out: &mut dyn Output) {
        for target in &self.targets {
            out.divider(&target.target);
            out.key_value("output", &target.output.display().to_string());
            out.key_value("mode", mode(target.strictness));

            if !self.lint_only {
                out.section(&plural(target.modules.len(), "module"));
                for module in &target.modules {
                    if module.formatted {
                        out.added_item(&module.path.display().to_string());
                    } else {
                        out.added_item(&format!("{} (unformatted)", module.path.display()));
                    }
                }
                for unit in &target.missing {
                    out.warning(&format!("no translator output for {}", unit.display()));
                }
            }

            if !target.rounds.is_empty() {
                out.section("lint rounds");
                for round in &target.rounds {
                    let mut line = format!(
                        "{}, {} fixed, {} skipped",
                        plural(round.in_scope, "warning"),
                        round.applied,
                        round.skipped.len()
                    );
                    let outside = round.warnings.saturating_sub(round.in_scope);
                    if outside > 0 {
                        line.push_str(&format!(", {} outside {}", outside, target.output.display()));
                    }
                    if !round.build_succeeded {
                        line.push_str(" (build failed)");
                    }
                    out.numbered_item(round.round, &line);
                }

                let residue: Vec<_> = target.rounds.iter().flat_map(|r| &r.skipped).collect();
                if !residue.is_empty() {
                    out.section("needs manual attention");
                    for edit in residue {
                        out.list_item(&format!(
                            "{}:{} `{}`: {}",
                            edit.file.display(),
                            edit.line,
                            edit.token,
                            edit.reason
                        ));
                    }
                }
            }

            if !self.lint_only && !target.snippet.is_empty() {
                out.section("register with");
                out.preformatted(target.snippet.trim_end());
            }
            out.newline();
        }

        out.preformatted(&format!(
            "{} processed, {} applied, {} left",
            plural(self.targets.len(), "target"),
            plural(self.applied(), "edit"),
            self.skipped()
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use scour_pipeline::{AssembledModule, RoundReport, SkippedEdit};
    use scour_rewrite::WarningKind;

    use super::*;
    use crate::reports::testing::BufferOutput;

    fn strict_target() -> TargetReport {
        TargetReport {
            target: "riscv32imac-unknown-xous-elf".to_string(),
            output: PathBuf::from("src/c2rust/xous"),
            strictness: Strictness::Strict,
            modules: vec![
                AssembledModule {
                    unit: PathBuf::from("crypto/mem.c"),
                    module: "mem".to_string(),
                    path: PathBuf::from("src/c2rust/xous/mem.rs"),
                    formatted: true,
                },
                AssembledModule {
                    unit: PathBuf::from("crypto/limbs/limbs.c"),
                    module: "limbs".to_string(),
                    path: PathBuf::from("src/c2rust/xous/limbs.rs"),
                    formatted: false,
                },
            ],
            missing: vec![PathBuf::from("crypto/cpu_intel.c")],
            rounds: vec![
                RoundReport {
                    round: 1,
                    build_succeeded: true,
                    warnings: 4,
                    in_scope: 3,
                    applied: 2,
                    skipped: vec![SkippedEdit {
                        file: PathBuf::from("src/c2rust/xous/limbs.rs"),
                        line: 40,
                        kind: WarningKind::UnusedInit,
                        token: "r".to_string(),
                        reason: "not a `let` binding or plain assignment".to_string(),
                    }],
                },
                RoundReport {
                    round: 2,
                    build_succeeded: true,
                    warnings: 1,
                    in_scope: 1,
                    applied: 0,
                    skipped: Vec::new(),
                },
            ],
            snippet: "#[cfg(target = \"riscv32imac-unknown-xous-elf\")]\nmod c2rust {\n}\n"
                .to_string(),
        }
    }

    #[test]
    fn test_render_run() {
        let report = RunReport {
            lint_only: false,
            targets: vec![strict_target()],
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);

        insta::assert_snapshot!(out.text(), @r#"
        ── riscv32imac-unknown-xous-elf ──
        output: src/c2rust/xous
        mode: strict
        2 modules:
          + src/c2rust/xous/mem.rs
          + src/c2rust/xous/limbs.rs (unformatted)
        warning: no translator output for crypto/cpu_intel.c
        lint rounds:
          1. 3 warnings, 2 fixed, 1 skipped, 1 outside src/c2rust/xous
          2. 1 warning, 0 fixed, 0 skipped
        needs manual attention:
          - src/c2rust/xous/limbs.rs:40 `r`: not a `let` binding or plain assignment
        register with:
        #[cfg(target = "riscv32imac-unknown-xous-elf")]
        mod c2rust {
        }

        1 target processed, 2 edits applied, 1 left
        "#);
    }

    #[test]
    fn test_render_lint_only_hides_assembly() {
        let report = RunReport {
            lint_only: true,
            targets: vec![strict_target()],
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);
        let text = out.text();

        assert!(!text.contains("modules:"));
        assert!(!text.contains("register with:"));
        assert!(text.contains("lint rounds:"));
    }
}
