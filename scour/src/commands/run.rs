use clap::Args;
use eyre::Result;
use scour_pipeline::SystemToolchain;

use super::ConfigArgs;
use crate::{
    ops::{self, RunOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Only process these targets (repeatable, defaults to all)
    #[arg(short = 't', long = "target")]
    pub targets: Vec<String>,

    /// Override the number of lint rounds for strict targets
    #[arg(long)]
    pub rounds: Option<usize>,
}

impl RunCommand {
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
                lint_only: false,
            },
        )?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
