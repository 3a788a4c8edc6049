//! Build descriptor (`compile_commands.json`) consumed by the translator.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use scour_core::{CompilerInvocation, TargetProfile, TranspilationUnit};
use serde::{Deserialize, Serialize};

/// One per-unit build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub directory: PathBuf,
    pub file: PathBuf,
    pub arguments: Vec<String>,
}

/// Ordered list of compile commands for one target profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildDescriptor {
    commands: Vec<CompileCommand>,
}

impl BuildDescriptor {
    /// Build the descriptor for `profile`.
    ///
    /// Arguments are `compiler -c -o <object> <base args> <target args> <file>`.
    pub fn synthesize(
        directory: &Path,
        compiler: &CompilerInvocation,
        units: &[TranspilationUnit],
        profile: &TargetProfile,
    ) -> Self {
        let commands = units
            .iter()
            .map(|unit| {
                let mut arguments = Vec::with_capacity(5 + compiler.args.len() + profile.args.len());
                arguments.push(compiler.command.clone());
                arguments.push("-c".to_string());
                arguments.push("-o".to_string());
                arguments.push(compiler.object.clone());
                arguments.extend(compiler.args.iter().cloned());
                arguments.extend(profile.args.iter().cloned());
                arguments.push(unit.source().display().to_string());

                CompileCommand {
                    directory: directory.to_path_buf(),
                    file: unit.source().to_path_buf(),
                    arguments,
                }
            })
            .collect();

        Self { commands }
    }

    pub fn commands(&self) -> &[CompileCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("failed to serialize build descriptor")
    }

    /// Write the descriptor to `path`, replacing any previous one.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)
            .wrap_err_with(|| format!("failed to write build descriptor '{}'", path.display()))
    }
}
