use clap::Args;
use eyre::Result;
use scour_pipeline::SystemToolchain;

use super::ConfigArgs;
use crate::{
    ops::{self, RunOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct LintCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Target to lint (repeatable)
    #[arg(short = 't', long = "target", required = true)]
    pub targets: Vec<String>,

    /// Number of lint rounds to run
    #[arg(long)]
    pub rounds: Option<usize>,
}

impl LintCommand {
    pub fn run(&self) -> Result<()> {
        let scour_toml = self.config.open();
        let manifest = scour_toml.manifest();
        let toolchain = SystemToolchain::new(&manifest.tools);

        let report = ops::run(
            manifest,
            &toolchain,
            RunOptions {
                root: self.config.root(&scour_toml),
                targets: &self.targets,
                rounds: self.rounds,
                lint_only: true,
            },
        )?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
