use clap::Args;
use eyre::Result;
use scour_pipeline::{Pipeline, SystemToolchain, snippet};

use super::ConfigArgs;

#[derive(Args)]
pub struct SnippetCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Only print snippets for these targets (repeatable, defaults to all)
    #[arg(short = 't', long = "target")]
    pub targets: Vec<String>,
}

impl SnippetCommand {
    pub fn run(&self) -> Result<()> {
        let scour_toml = self.config.open();
        let manifest = scour_toml.manifest();
        let toolchain = SystemToolchain::new(&manifest.tools);
        let pipeline = Pipeline::new(manifest, self.config.root(&scour_toml), &toolchain)
            .targets(&self.targets);

        let rendered: Vec<_> = pipeline
            .selected()?
            .into_iter()
            .map(|profile| snippet(profile, manifest.modules().map(|(_, module)| module)))
            .collect();
        print!("{}", rendered.join("\n"));
        Ok(())
    }
}
