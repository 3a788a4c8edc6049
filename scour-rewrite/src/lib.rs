//! The rewriting engine behind scour.
//!
//! # Module Organization
//!
//! - [`normalize`] - context-free line rewriting of raw translator output
//! - [`diagnostics`] - compiler output scanner producing a [`WarningMap`]
//! - [`patch`] - column-addressed edits that silence recorded warnings
//! - [`descriptor`] - the build descriptor (`compile_commands.json`) handed to the translator

pub mod descriptor;
pub mod diagnostics;
pub mod normalize;
pub mod patch;

pub use descriptor::{BuildDescriptor, CompileCommand};
pub use diagnostics::{WarningKind, WarningMap, WarningRecord, parse_diagnostics};
pub use normalize::{Normalizer, normalize_line};
pub use patch::{EditOutcome, FilePatch, PatchResult, SkipReason, patch_dir, patch_line, patch_text};
