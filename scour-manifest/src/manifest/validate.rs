//! Validation context and utilities for manifest parsing.

use std::{collections::HashMap, path::Path};

use miette::SourceSpan;
use scour_core::{ToolCommand, TranspilationUnit};

use super::Manifest;
use crate::{Result, error::SourceContext};

/// Validation context that carries source information for error spans.
///
/// ```ignore
/// let ctx = ParseContext::new(src, "scour.toml");
/// ctx.validate_module(&unit)?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext {
    source: SourceContext,
}

impl ParseContext {
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: SourceContext::new(src, filename),
        }
    }

    pub fn src(&self) -> &str {
        self.source.src()
    }

    pub fn filename(&self) -> &str {
        self.source.filename()
    }

    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Validate the whole manifest.
    pub fn validate(&self, manifest: &Manifest) -> Result<()> {
        self.validate_targets(manifest)?;
        self.validate_units(manifest.units())?;
        self.validate_tool("translate", &manifest.tools.translate)?;
        self.validate_tool("build", &manifest.tools.build)?;
        self.validate_tool("format", &manifest.tools.format)?;
        Ok(())
    }

    fn validate_targets(&self, manifest: &Manifest) -> Result<()> {
        if manifest.targets.is_empty() {
            return Err(self
                .source
                .validation_error("no [[targets]] defined; at least one target profile is required"));
        }

        let mut ids: HashMap<&str, usize> = HashMap::new();
        let mut outputs: HashMap<&Path, usize> = HashMap::new();

        for (index, profile) in manifest.targets.iter().enumerate() {
            if profile.target.trim().is_empty() {
                return Err(self.source.validation_error_at(
                    format!("target #{} has an empty identifier", index + 1),
                    find_key_span(self.src(), "target"),
                ));
            }

            if ids.insert(&profile.target, index).is_some() {
                let spans = find_value_spans(self.src(), &profile.target);
                return Err(self.source.duplicate_target_error(
                    "identifier",
                    &profile.target,
                    spans.first().copied(),
                    spans.get(1).copied(),
                ));
            }

            if outputs.insert(&profile.output, index).is_some() {
                let output = profile.output.display().to_string();
                let spans = find_value_spans(self.src(), &output);
                return Err(self.source.duplicate_target_error(
                    "output directory",
                    output,
                    spans.first().copied(),
                    spans.get(1).copied(),
                ));
            }
        }

        Ok(())
    }

    fn validate_units(&self, units: &[TranspilationUnit]) -> Result<()> {
        if units.is_empty() {
            return Err(self.source.validation_error_at(
                "[sources].units is empty; nothing to translate",
                find_key_span(self.src(), "units"),
            ));
        }

        let mut seen: HashMap<&str, &TranspilationUnit> = HashMap::new();

        for unit in units {
            let module = self.validate_module(unit)?;

            if let Some(first) = seen.insert(module, unit) {
                let first_path = first.source().display().to_string();
                let second_path = unit.source().display().to_string();
                let first_span = find_value_spans(self.src(), &first_path).first().copied();
                let second_span = find_value_spans(self.src(), &second_path)
                    .into_iter()
                    .find(|span| Some(*span) != first_span);
                return Err(self.source.duplicate_module_error(
                    module,
                    first_path,
                    second_path,
                    first_span,
                    second_span,
                ));
            }
        }

        Ok(())
    }

    /// Check that a unit yields a usable module name and return it.
    pub fn validate_module<'u>(&self, unit: &'u TranspilationUnit) -> Result<&'u str> {
        let path = unit.source().display().to_string();

        let Some(module) = unit.module_name() else {
            return Err(self.source.validation_error_at(
                format!("'{}' has no file stem to name a module after", path),
                find_value_spans(self.src(), &path).first().copied(),
            ));
        };

        if is_rust_keyword(module) {
            return Err(self.source.reserved_keyword_error(
                module,
                &path,
                find_module_span(self.src(), unit),
            ));
        }

        if let Some(reason) = validate_identifier(module) {
            return Err(self.source.invalid_identifier_error(
                module,
                &path,
                reason,
                find_module_span(self.src(), unit),
            ));
        }

        Ok(module)
    }

    fn validate_tool(&self, name: &str, command: &ToolCommand) -> Result<()> {
        if command.is_empty() {
            return Err(self.source.validation_error_at(
                format!("[tools].{} must name a program", name),
                find_key_span(self.src(), name),
            ));
        }
        Ok(())
    }
}

/// Rust reserved keywords that cannot be used as module names
/// Source: https://doc.rust-lang.org/reference/keywords.html
pub(crate) const RUST_KEYWORDS: &[&str] = &[
    // Strict keywords
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    // Reserved keywords
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

pub(crate) fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Validate that a module name is a plain Rust identifier.
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if name == "_" {
        return Some("'_' is not a usable module name");
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}

/// Find every quoted occurrence of `value` (`"value"` or `'value'`) and return
/// the spans of the unquoted text, in source order.
pub(crate) fn find_value_spans(src: &str, value: &str) -> Vec<SourceSpan> {
    let mut spans = Vec::new();
    for quote in ['"', '\''] {
        let pattern = format!("{quote}{value}{quote}");
        spans.extend(
            src.match_indices(&pattern)
                .map(|(pos, _)| SourceSpan::from((pos + 1, value.len()))),
        );
    }
    spans.sort_by_key(|span| span.offset());
    spans
}

/// Find the module-name part of a unit path inside its quoted value
/// (`"crypto/fn.c"` -> span of `fn`).
pub(crate) fn find_module_span(src: &str, unit: &TranspilationUnit) -> Option<SourceSpan> {
    let path = unit.source().display().to_string();
    let module = unit.module_name()?;
    let file_name = unit.source().file_name()?.to_str()?;
    let value = find_value_spans(src, &path).into_iter().next()?;
    let start = value.offset() + path.len() - file_name.len();
    Some(SourceSpan::from((start, module.len())))
}

/// Find a `key = ...` assignment at the start of a line.
pub(crate) fn find_key_span(src: &str, key: &str) -> Option<SourceSpan> {
    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(key)
            && rest.trim_start().starts_with('=')
        {
            let start = offset + (line.len() - trimmed.len());
            return Some(SourceSpan::from((start, key.len())));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("mem").is_none());
        assert!(validate_identifier("aes_nohw").is_none());
        assert!(validate_identifier("montgomery_inv").is_none());
        assert!(validate_identifier("_private").is_none());
        assert!(validate_identifier("p256").is_none());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(validate_identifier("").is_some());
        assert!(validate_identifier("_").is_some());
        assert!(validate_identifier("1st").is_some());
        assert!(validate_identifier("curve25519-tables").is_some());
        assert!(validate_identifier("x 1").is_some());
    }

    #[test]
    fn test_is_rust_keyword() {
        assert!(is_rust_keyword("fn"));
        assert!(is_rust_keyword("mod"));
        assert!(is_rust_keyword("gen"));
        assert!(!is_rust_keyword("limbs"));
    }

    #[test]
    fn test_find_value_spans() {
        let src = r#"units = ["crypto/mem.c", 'crypto/mem.c']"#;
        let spans = find_value_spans(src, "crypto/mem.c");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].offset(), 10);
        assert_eq!(spans[0].len(), 12);
        assert_eq!(spans[1].offset(), 26);
    }

    #[test]
    fn test_find_module_span() {
        let src = r#"units = ["crypto/fn.c"]"#;
        let span = find_module_span(src, &TranspilationUnit::new("crypto/fn.c")).unwrap();
        assert_eq!(span.offset(), 17);
        assert_eq!(span.len(), 2);
        assert_eq!(&src[17..19], "fn");
    }

    #[test]
    fn test_find_key_span() {
        let src = "[tools]\n  build = []\n";
        let span = find_key_span(src, "build").unwrap();
        assert_eq!(span.offset(), 10);
        assert_eq!(span.len(), 5);
        assert!(find_key_span(src, "format").is_none());
    }

    #[test]
    fn test_find_key_span_requires_assignment() {
        let src = "builder = 1\nbuild = []\n";
        assert_eq!(find_key_span(src, "build").unwrap().offset(), 12);
    }

    #[test]
    fn test_validate_module_keyword() {
        let src = r#"units = ["crypto/fn.c"]"#;
        let ctx = ParseContext::new(src, "scour.toml");
        let err = ctx
            .validate_module(&TranspilationUnit::new("crypto/fn.c"))
            .unwrap_err();
        assert!(err.to_string().contains("reserved keyword"));
    }

    #[test]
    fn test_validate_module_ok() {
        let ctx = ParseContext::new("", "scour.toml");
        let unit = TranspilationUnit::new("crypto/fipsmodule/bn/montgomery.c");
        assert_eq!(ctx.validate_module(&unit).unwrap(), "montgomery");
    }
}
