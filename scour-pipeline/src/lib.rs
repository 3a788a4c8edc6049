//! Orchestration of the translate, assemble, and lint cycle.
//!
//! # Module Organization
//!
//! - [`toolchain`] - external translator, compiler, and formatter invocations
//! - [`assemble`] - raw translator output to normalized module on disk
//! - [`lint`] - compile, parse, and patch rounds for one target
//! - [`runner`] - per-target sequencing and the run report
//! - [`integration`] - module registration snippet printed after a run
//! - [`testing`] - scripted toolchain for tests (feature-gated)

pub mod assemble;
pub mod integration;
pub mod lint;
pub mod runner;
pub mod toolchain;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use assemble::{AssembledModule, MODULE_EXTENSION, NormalizedModule, assemble_unit, prologue};
pub use integration::snippet;
pub use lint::{RoundReport, SkippedEdit, lint, lint_round};
pub use runner::{Pipeline, PipelineReport, TargetReport};
pub use toolchain::{SystemToolchain, ToolOutput, Toolchain};
