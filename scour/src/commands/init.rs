use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Context, Result};
use scour_core::{File, WriteResult};
use scour_manifest::STARTER_MANIFEST;

#[derive(Args)]
pub struct InitCommand {
    /// Directory to create scour.toml in
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

impl InitCommand {
    pub fn run(&self) -> Result<()> {
        let path = self.dir.join("scour.toml");
        let result = File::new(&path, STARTER_MANIFEST)
            .if_missing()
            .write()
            .wrap_err("Failed to write scour.toml")?;

        match result {
            WriteResult::Written => {
                println!("Created {}", path.display());
                println!();
                println!("Next steps:");
                if self.dir != Path::new(".") {
                    println!("  cd {}", self.dir.display());
                }
                println!("  scour check");
                println!("  scour run");
            }
            WriteResult::Skipped => {
                println!("{} already exists, leaving it untouched", path.display());
            }
        }
        Ok(())
    }
}
