use clap::Args;
use eyre::Result;
use scour_pipeline::{Pipeline, SystemToolchain};

use super::ConfigArgs;

#[derive(Args)]
pub struct DescriptorCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Target whose build descriptor to print
    #[arg(short = 't', long = "target")]
    pub target: String,
}

impl DescriptorCommand {
    pub fn run(&self) -> Result<()> {
        let scour_toml = self.config.open();
        let manifest = scour_toml.manifest();
        let toolchain = SystemToolchain::new(&manifest.tools);
        let pipeline = Pipeline::new(manifest, self.config.root(&scour_toml), &toolchain)
            .targets([self.target.as_str()]);

        for profile in pipeline.selected()? {
            println!("{}", pipeline.descriptor(profile)?.to_json()?);
        }
        Ok(())
    }
}
