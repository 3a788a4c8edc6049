//! External tool command lines.

use serde::{Deserialize, Serialize};

/// A command line for an external tool, stored as program + arguments.
///
/// Arguments may contain a `{target}` placeholder that is substituted with the
/// target identifier when the command is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCommand(Vec<String>);

impl ToolCommand {
    pub fn new(parts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The program to run, if any.
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Arguments after the program with `{target}` substituted.
    pub fn args_for(&self, target: &str) -> Vec<String> {
        self.0
            .iter()
            .skip(1)
            .map(|arg| arg.replace("{target}", target))
            .collect()
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_and_args() {
        let cmd = ToolCommand::new(["cargo", "build", "--target={target}"]);
        assert_eq!(cmd.program(), Some("cargo"));
        assert_eq!(
            cmd.args_for("wasm32-unknown-unknown"),
            vec!["build", "--target=wasm32-unknown-unknown"]
        );
    }

    #[test]
    fn test_empty_command() {
        let cmd = ToolCommand::new(Vec::<String>::new());
        assert!(cmd.is_empty());
        assert_eq!(cmd.program(), None);
        assert!(cmd.args_for("x").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ToolCommand::new(["c2rust", "transpile"]).to_string(),
            "c2rust transpile"
        );
    }
}
