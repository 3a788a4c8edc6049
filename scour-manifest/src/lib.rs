// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    Manifest, NormalizeConfig, ParseContext, ProjectConfig, STARTER_MANIFEST, ScourToml,
    SourcesConfig, ToolsConfig,
};
