use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use scour_manifest::ScourToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to scour.toml (defaults to ./scour.toml)
    #[arg(short, long, default_value = "scour.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let scour_toml = ScourToml::open(&self.config).unwrap_or_exit();
        let report = ops::check(scour_toml.manifest(), &self.config);
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
