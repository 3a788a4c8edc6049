use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use scour_core::File;
use scour_manifest::{NormalizeConfig, ScourToml};
use scour_rewrite::Normalizer;

use super::UnwrapOrExit;

#[derive(Args)]
pub struct NormalizeCommand {
    /// Raw translator output to normalize
    pub file: PathBuf,

    /// Overwrite FILE instead of printing to stdout
    #[arg(long)]
    pub in_place: bool,

    /// Read the discard-call list from this scour.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl NormalizeCommand {
    pub fn run(&self) -> Result<()> {
        let discard_calls = match &self.config {
            Some(path) => ScourToml::open(path)
                .unwrap_or_exit()
                .manifest()
                .normalize
                .discard_calls
                .clone(),
            None => NormalizeConfig::default().discard_calls,
        };
        let normalizer = Normalizer::with_discard_calls(discard_calls);

        let raw = std::fs::read_to_string(&self.file)
            .wrap_err_with(|| format!("Failed to read {}", self.file.display()))?;
        let normalized = normalizer.normalize_text(&raw);

        if self.in_place {
            File::new(&self.file, normalized)
                .write()
                .wrap_err_with(|| format!("Failed to write {}", self.file.display()))?;
        } else {
            print!("{}", normalized);
        }
        Ok(())
    }
}
