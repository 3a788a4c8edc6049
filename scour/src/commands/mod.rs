mod check;
mod completions;
mod descriptor;
mod init;
mod lint;
mod normalize;
mod run;
mod snippet;

use std::path::{Path, PathBuf};

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use descriptor::DescriptorCommand;
use eyre::Result;
use init::InitCommand;
use lint::LintCommand;
use normalize::NormalizeCommand;
use run::RunCommand;
use scour_manifest::ScourToml;
use snippet::SnippetCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for scour_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "scour")]
#[command(version)]
#[command(about = "Make c2rust output build on no_std targets")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Run(cmd) => cmd.run(),
            Commands::Lint(cmd) => cmd.run(),
            Commands::Normalize(cmd) => cmd.run(),
            Commands::Descriptor(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Snippet(cmd) => cmd.run(),
            Commands::Init(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Translate, normalize, and lint every target
    Run(RunCommand),

    /// Re-run the lint rounds on modules already on disk
    Lint(LintCommand),

    /// Apply the line normalizer to a single file
    Normalize(NormalizeCommand),

    /// Print the build descriptor for a target
    Descriptor(DescriptorCommand),

    /// Validate scour.toml without running anything
    Check(CheckCommand),

    /// Print the module registration snippet for each target
    Snippet(SnippetCommand),

    /// Write a starter scour.toml
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Location of scour.toml and the project root it describes.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to scour.toml (defaults to ./scour.toml)
    #[arg(short, long, default_value = "scour.toml")]
    pub config: PathBuf,

    /// Project root (defaults to the directory containing scour.toml)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl ConfigArgs {
    /// Open scour.toml, exiting with a rendered diagnostic if it is invalid.
    pub fn open(&self) -> ScourToml {
        ScourToml::open(&self.config).unwrap_or_exit()
    }

    pub fn root<'a>(&'a self, toml: &'a ScourToml) -> &'a Path {
        self.root.as_deref().unwrap_or_else(|| toml.root())
    }
}
