use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source content and filename carried into every manifest error.
///
/// ```ignore
/// let ctx = SourceContext::new(content, "scour.toml");
/// ctx.validation_error("no [[targets]] defined");
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error without a span.
    pub fn validation_error(&self, message: impl Into<String>) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: None,
            message: message.into(),
        })
    }

    /// Create a validation error, pointing at `span` when one was found.
    pub fn validation_error_at(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    pub fn reserved_keyword_error(
        &self,
        name: impl Into<String>,
        unit: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::ReservedKeyword {
            src: self.named_source(),
            span,
            name: name.into(),
            unit: unit.into(),
        })
    }

    pub fn invalid_identifier_error(
        &self,
        name: impl Into<String>,
        unit: impl Into<String>,
        reason: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidIdentifier {
            src: self.named_source(),
            span,
            name: name.into(),
            unit: unit.into(),
            reason: reason.into(),
        })
    }

    pub fn duplicate_module_error(
        &self,
        module: impl Into<String>,
        first_unit: impl Into<String>,
        second_unit: impl Into<String>,
        first_span: Option<SourceSpan>,
        second_span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicateModule {
            src: self.named_source(),
            first_span,
            second_span,
            module: module.into(),
            first_unit: first_unit.into(),
            second_unit: second_unit.into(),
        })
    }

    pub fn duplicate_target_error(
        &self,
        field: &'static str,
        value: impl Into<String>,
        first_span: Option<SourceSpan>,
        second_span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicateTarget {
            src: self.named_source(),
            first_span,
            second_span,
            field,
            value: value.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("run 'scour init' to create a starter scour.toml"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scour.toml")]
    #[diagnostic(code(scour::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(scour::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("module '{name}' derived from '{unit}' is a Rust reserved keyword")]
    #[diagnostic(
        code(scour::reserved_keyword),
        help("modules are named after the source file stem; rename the C file")
    )]
    ReservedKeyword {
        #[source_code]
        src: NamedSource<String>,
        #[label("reserved keyword used here")]
        span: Option<SourceSpan>,
        name: String,
        unit: String,
    },

    #[error("invalid module name '{name}' derived from '{unit}'")]
    #[diagnostic(
        code(scour::invalid_identifier),
        help("{reason}. Use only letters, numbers, and underscores, starting with a letter or underscore.")
    )]
    InvalidIdentifier {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid identifier")]
        span: Option<SourceSpan>,
        name: String,
        unit: String,
        reason: String,
    },

    #[error("module '{module}' is produced by both '{first_unit}' and '{second_unit}'")]
    #[diagnostic(
        code(scour::duplicate_module),
        help("every unit of a target is written to <output>/<module>.rs, so file stems must be unique")
    )]
    DuplicateModule {
        #[source_code]
        src: NamedSource<String>,
        #[label("first produced here")]
        first_span: Option<SourceSpan>,
        #[label("conflicts with first unit")]
        second_span: Option<SourceSpan>,
        module: String,
        first_unit: String,
        second_unit: String,
    },

    #[error("duplicate target {field} '{value}'")]
    #[diagnostic(
        code(scour::duplicate_target),
        help("each [[targets]] entry needs its own {field}")
    )]
    DuplicateTarget {
        #[source_code]
        src: NamedSource<String>,
        #[label("first used here")]
        first_span: Option<SourceSpan>,
        #[label("used again here")]
        second_span: Option<SourceSpan>,
        field: &'static str,
        value: String,
    },
}
