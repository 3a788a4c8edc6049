//! Manifest types and parsing for scour.toml files.

mod file;
mod parse;
mod starter;
mod validate;

use std::path::PathBuf;

pub use file::ScourToml;
use scour_core::{
    CompilerInvocation, DEFAULT_DISCARD_CALLS, TargetProfile, ToolCommand, TranspilationUnit,
};
use serde::Deserialize;
pub use starter::STARTER_MANIFEST;
pub use validate::ParseContext;

/// Root manifest for scour.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub project: ProjectConfig,

    /// Invocation recorded in every build descriptor entry
    #[serde(default)]
    pub compiler: CompilerInvocation,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub normalize: NormalizeConfig,

    pub sources: SourcesConfig,

    /// Target profiles, processed in declaration order
    #[serde(default)]
    pub targets: Vec<TargetProfile>,
}

/// `[project]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Build descriptor file name, relative to the project root. The
    /// translator only recognizes this name, so it is shared by all targets.
    pub descriptor: PathBuf,

    /// Number of compile-parse-patch rounds for strict targets
    pub lint_rounds: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            descriptor: PathBuf::from("compile_commands.json"),
            lint_rounds: 3,
        }
    }
}

/// `[tools]` section: external programs invoked as child processes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Translator; the descriptor path is appended
    pub translate: ToolCommand,

    /// Target build; `{target}` is substituted
    pub build: ToolCommand,

    /// Formatter; the module path is appended
    pub format: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            translate: ToolCommand::new(["c2rust", "transpile"]),
            build: ToolCommand::new(["cargo", "build", "--target={target}"]),
            format: ToolCommand::new(["rustfmt"]),
        }
    }
}

/// `[normalize]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Calls whose unused return value gets an explicit `let _ =`
    pub discard_calls: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            discard_calls: DEFAULT_DISCARD_CALLS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// `[sources]` section
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// C sources, relative to the project root
    #[serde(default)]
    pub units: Vec<TranspilationUnit>,
}

impl Manifest {
    pub fn units(&self) -> &[TranspilationUnit] {
        &self.sources.units
    }

    /// Look up a target profile by identifier.
    pub fn target(&self, id: &str) -> Option<&TargetProfile> {
        self.targets.iter().find(|t| t.target == id)
    }

    /// Units paired with their module names.
    ///
    /// Every unit of a validated manifest has a module name.
    pub fn modules(&self) -> impl Iterator<Item = (&TranspilationUnit, &str)> {
        self.sources
            .units
            .iter()
            .filter_map(|unit| unit.module_name().map(|name| (unit, name)))
    }
}
