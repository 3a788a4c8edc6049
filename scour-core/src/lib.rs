//! Core utilities and types for scour.
//!
//! This crate provides the data model shared by the manifest, the rewriting
//! engine and the pipeline: translation units, target profiles, tool
//! commands, and the file-writing helpers used to persist modules.

mod file;
mod tool;
mod types;

// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult, remove_if_exists};
// External tool invocation
pub use tool::ToolCommand;
// Fundamental types
pub use types::{
    CompilerInvocation, DEFAULT_DISCARD_CALLS, Strictness, TargetProfile, TranspilationUnit,
};
