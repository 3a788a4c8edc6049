//! Check command report data structures.

use std::path::PathBuf;

use scour_core::Strictness;

use super::output::{Output, Report};

/// One target profile as declared in the manifest.
#[derive(Debug)]
pub struct TargetSummary {
    pub target: String,
    pub output: PathBuf,
    pub strictness: Strictness,
    /// Target-specific compiler flags, space separated.
    pub args: String,
}

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    pub descriptor: PathBuf,
    pub lint_rounds: usize,
    /// (module name, source unit) in manifest order.
    pub modules: Vec<(String, PathBuf)>,
    pub targets: Vec<TargetSummary>,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        out.newline();

        out.key_value("descriptor", &self.descriptor.display().to_string());
        out.key_value("lint rounds", &self.lint_rounds.to_string());
        out.newline();

        out.section(&format!(
            "{} unit{}",
            self.modules.len(),
            if self.modules.len() == 1 { "" } else { "s" }
        ));
        for (module, unit) in &self.modules {
            out.list_item(&format!("{} ({})", module, unit.display()));
        }
        out.newline();

        out.section(&format!(
            "{} target{}",
            self.targets.len(),
            if self.targets.len() == 1 { "" } else { "s" }
        ));
        for target in &self.targets {
            let mode = match target.strictness {
                Strictness::Strict => "strict",
                Strictness::Lenient => "lenient",
            };
            out.list_item(&format!(
                "{} -> {} [{}]",
                target.target,
                target.output.display(),
                mode
            ));
            if !target.args.is_empty() {
                out.preformatted(&format!("      {}", target.args));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::testing::BufferOutput;

    #[test]
    fn test_render_check() {
        let report = CheckReport {
            config_path: PathBuf::from("scour.toml"),
            descriptor: PathBuf::from("compile_commands.json"),
            lint_rounds: 3,
            modules: vec![("mem".to_string(), PathBuf::from("crypto/mem.c"))],
            targets: vec![
                TargetSummary {
                    target: "riscv32imac-unknown-xous-elf".to_string(),
                    output: PathBuf::from("src/c2rust/xous"),
                    strictness: Strictness::Strict,
                    args: "-D__xous__ -m32".to_string(),
                },
                TargetSummary {
                    target: "wasm32-unknown-unknown".to_string(),
                    output: PathBuf::from("src/c2rust/wasm32"),
                    strictness: Strictness::Lenient,
                    args: String::new(),
                },
            ],
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);

        insta::assert_snapshot!(out.text(), @"
        ✓ scour.toml is valid

        descriptor: compile_commands.json
        lint rounds: 3

        1 unit:
          - mem (crypto/mem.c)

        2 targets:
          - riscv32imac-unknown-xous-elf -> src/c2rust/xous [strict]
              -D__xous__ -m32
          - wasm32-unknown-unknown -> src/c2rust/wasm32 [lenient]
        ");
    }
}
