//! Fundamental types shared across scour crates.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One C source file translated as an independent compilation input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranspilationUnit {
    source: PathBuf,
}

impl TranspilationUnit {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Path of the C source, relative to the project root.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Module name derived from the file name, up to its first dot
    /// (`crypto/fipsmodule/bn/montgomery.c` -> `montgomery`).
    ///
    /// Returns `None` when the path has no usable file name.
    pub fn module_name(&self) -> Option<&str> {
        let name = self.source.file_name()?.to_str()?;
        name.split('.').next().filter(|stem| !stem.is_empty())
    }

    /// Where the translator drops its output for this unit: same location,
    /// different extension.
    pub fn raw_output(&self, extension: &str) -> PathBuf {
        self.source.with_extension(extension)
    }
}

/// Calls whose return value must be explicitly discarded, unless configured
/// otherwise.
pub const DEFAULT_DISCARD_CALLS: &[&str] = &[
    "GFp_memcpy",
    "GFp_memset",
    "GFp_bn_from_montgomery_in_place",
];

/// How strictly warnings are treated for a target profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Blanket `allow(warnings)`, no lint rounds.
    Lenient,
    /// Only naming lints are allowed; remaining warnings are patched.
    Strict,
}

/// A named deployment configuration with its own flags and output location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProfile {
    /// Target identifier passed to the build tool (usually a target triple).
    pub target: String,

    /// Extra compiler flags appended after the base arguments.
    #[serde(default)]
    pub args: Vec<String>,

    /// Directory the normalized modules are saved to.
    pub output: PathBuf,

    /// Skip the strict lint rounds and emit a blanket suppression instead.
    #[serde(default)]
    pub skip_lint: bool,

    /// Guard expression for the integration snippet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfg: Option<String>,
}

impl TargetProfile {
    pub fn new(target: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            args: Vec::new(),
            output: output.into(),
            skip_lint: false,
            cfg: None,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn lenient(mut self) -> Self {
        self.skip_lint = true;
        self
    }

    pub fn strictness(&self) -> Strictness {
        if self.skip_lint {
            Strictness::Lenient
        } else {
            Strictness::Strict
        }
    }

    /// Path of the normalized module for `module` inside the output directory.
    pub fn module_path(&self, module: &str, extension: &str) -> PathBuf {
        self.output.join(format!("{}.{}", module, extension))
    }

    /// The `cfg(...)` guard used when registering the module set.
    pub fn cfg_guard(&self) -> String {
        match &self.cfg {
            Some(cfg) => cfg.clone(),
            None => format!("target = \"{}\"", self.target),
        }
    }

    /// Last component of the output directory (`src/c2rust/xous` -> `xous`).
    pub fn output_leaf(&self) -> String {
        self.output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The C compiler invocation recorded in each build descriptor entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerInvocation {
    /// Compiler program name (first argument).
    pub command: String,

    /// Object path passed to `-o`; never actually produced.
    pub object: String,

    /// Include/define/undefine flags shared by every target.
    pub args: Vec<String>,
}

impl Default for CompilerInvocation {
    fn default() -> Self {
        Self {
            command: "cc".to_string(),
            object: "build/tmp.o".to_string(),
            args: vec![
                "-Iinclude".to_string(),
                "-UOPENSSL_X86_64".to_string(),
                "-U__x86_64".to_string(),
            ],
        }
    }
}
