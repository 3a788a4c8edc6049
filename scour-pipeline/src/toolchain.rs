//! External collaborators invoked as child processes.

use std::{path::Path, process::Command};

use eyre::{Result, WrapErr, eyre};
use scour_core::ToolCommand;
use scour_manifest::ToolsConfig;
use tracing::debug;

/// Exit status and captured text of one tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    /// stdout followed by stderr
    pub output: String,
}

impl ToolOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }
}

/// The translator, compiler, and formatter the pipeline drives.
///
/// A non-zero exit is reported through [`ToolOutput::success`]; `Err` means
/// the tool could not be run at all.
pub trait Toolchain {
    /// Translate every unit listed in the build descriptor, in `root`.
    fn translate(&self, root: &Path, descriptor: &Path) -> Result<ToolOutput>;

    /// Build the project for `target`, in `root`.
    fn build(&self, root: &Path, target: &str) -> Result<ToolOutput>;

    /// Format one module in place.
    fn format(&self, module: &Path) -> Result<ToolOutput>;
}

/// Runs the commands from `[tools]`.
#[derive(Debug, Clone)]
pub struct SystemToolchain {
    translate: ToolCommand,
    build: ToolCommand,
    format: ToolCommand,
}

impl SystemToolchain {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            translate: tools.translate.clone(),
            build: tools.build.clone(),
            format: tools.format.clone(),
        }
    }
}

impl Toolchain for SystemToolchain {
    fn translate(&self, root: &Path, descriptor: &Path) -> Result<ToolOutput> {
        let mut args = self.translate.args_for("");
        args.push(descriptor.display().to_string());
        run(&self.translate, args, Some(root))
    }

    fn build(&self, root: &Path, target: &str) -> Result<ToolOutput> {
        run(&self.build, self.build.args_for(target), Some(root))
    }

    fn format(&self, module: &Path) -> Result<ToolOutput> {
        let mut args = self.format.args_for("");
        args.push(module.display().to_string());
        run(&self.format, args, None)
    }
}

fn run(command: &ToolCommand, args: Vec<String>, dir: Option<&Path>) -> Result<ToolOutput> {
    let program = command
        .program()
        .ok_or_else(|| eyre!("tool command is empty"))?;

    let mut cmd = Command::new(program);
    cmd.args(&args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    debug!(program, args = ?args, "running tool");
    let output = cmd
        .output()
        .wrap_err_with(|| format!("failed to run '{}'", program))?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(ToolOutput {
        success: output.status.success(),
        output: text,
    })
}
