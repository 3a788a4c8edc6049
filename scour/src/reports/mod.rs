//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod output;
mod run;

pub use check::{CheckReport, TargetSummary};
pub use output::{Report, TerminalOutput};
pub use run::RunReport;
