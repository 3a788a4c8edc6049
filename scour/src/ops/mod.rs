//! Core operations.
//!
//! This module contains the business logic for scour commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod run;

pub use check::check;
pub use run::{RunOptions, run};
