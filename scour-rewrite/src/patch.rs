//! Column-addressed edits that silence recorded warnings.
//!
//! Edits splice the current line text at the reported column without any
//! parsing. Each line carries at most one record per round, so the column
//! always refers to the text the compiler saw. An edit whose expected token is
//! not at the column is skipped and reported instead of guessed at.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use eyre::{Result, WrapErr};
use regex::Regex;
use tracing::{debug, warn};

use crate::diagnostics::{WarningKind, WarningMap, WarningRecord};

/// `let [mut] name[: T] = init;` with the statement ending on the same line.
static LET_INIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<binding>\blet\s+(?:mut\s+)?(?P<name>[A-Za-z_]\w*)(?:\s*:[^=]*?)?)\s*=\s*(?P<init>[^;]*?)\s*;",
    )
    .unwrap()
});

/// `0`, optional integer suffix, then any number of `as T` casts, including
/// raw pointer casts (`0 as *mut T`).
static ZERO_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^0(?:_?[iu](?:8|16|32|64|128|size))?(?:\s+as\s+(?:\*(?:mut|const)\s+)*[\w:]+)*$",
    )
    .unwrap()
});

/// Why an edit was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The column lies outside the line.
    ColumnOutOfRange { column: usize, width: usize },
    /// The expected token is not at the column.
    TokenMismatch { expected: String, found: String },
    /// An unused value that is neither a `let` binding nor a plain assignment.
    UnsupportedAssignment,
    /// A `let` whose initializer cannot be split off on its own line.
    ComplexInitializer,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ColumnOutOfRange { column, width } => {
                write!(f, "column {} is past the end of a {}-character line", column, width)
            }
            SkipReason::TokenMismatch { expected, found } => {
                write!(f, "expected `{}` at column, found `{}`", expected, found)
            }
            SkipReason::UnsupportedAssignment => {
                write!(f, "not a `let` binding or plain assignment")
            }
            SkipReason::ComplexInitializer => {
                write!(f, "initializer is not the last statement on its line")
            }
        }
    }
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Applied {
        line: usize,
        kind: WarningKind,
    },
    Skipped {
        line: usize,
        record: WarningRecord,
        reason: SkipReason,
    },
}

/// Result of patching one module's text.
#[derive(Debug, Clone, Default)]
pub struct PatchResult {
    pub text: String,
    pub outcomes: Vec<EditOutcome>,
}

impl PatchResult {
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EditOutcome::Applied { .. }))
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &EditOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EditOutcome::Skipped { .. }))
    }
}

/// Patch summary for one file on disk.
#[derive(Debug, Clone)]
pub struct FilePatch {
    pub path: PathBuf,
    pub outcomes: Vec<EditOutcome>,
}

impl FilePatch {
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EditOutcome::Applied { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}

/// Apply one record to one line (without its line terminator).
pub fn patch_line(line: &str, record: &WarningRecord) -> Result<String, SkipReason> {
    let at = byte_offset(line, record.column).ok_or(SkipReason::ColumnOutOfRange {
        column: record.column,
        width: line.chars().count(),
    })?;
    let (head, rest) = line.split_at(at);

    match record.kind {
        WarningKind::UnusedInit => {
            if let Some(patched) = patch_let_init(line, at, &record.token) {
                return patched;
            }
            expect_token(rest, &record.token)?;
            if is_let_binding(head) {
                return Err(SkipReason::UnsupportedAssignment);
            }
            let after = rest[record.token.len()..].trim_start();
            if after.starts_with('=') && !after.starts_with("==") {
                Ok(format!("{}let _{}", head, rest))
            } else {
                Err(SkipReason::UnsupportedAssignment)
            }
        }
        WarningKind::UnusedVariable | WarningKind::UnusedFunction => {
            expect_token(rest, &record.token)?;
            Ok(format!("{}_{}", head, rest))
        }
        WarningKind::RemovableMut => {
            expect_token(rest, "mut")?;
            let tail = rest["mut".len()..].trim_start();
            Ok(format!("{}{}", head, tail))
        }
    }
}

/// Silence an unread `let` initializer. The column may point at the binding
/// or at the initializer; `None` when no `let` on the line starts there.
///
/// A zero initializer is deleted, leaving a deferred declaration. Any other
/// initializer is still evaluated, into `let _`, ahead of the declaration.
fn patch_let_init(line: &str, at: usize, token: &str) -> Option<Result<String, SkipReason>> {
    let caps = LET_INIT.captures_iter(line).find(|caps| {
        caps.name("name").is_some_and(|m| m.start() == at)
            || caps.name("init").is_some_and(|m| m.start() == at)
    })?;
    let (Some(stmt), Some(binding), Some(name), Some(init)) =
        (caps.get(0), caps.name("binding"), caps.name("name"), caps.name("init"))
    else {
        return None;
    };

    if name.as_str() != token {
        return Some(Err(SkipReason::TokenMismatch {
            expected: token.to_string(),
            found: name.as_str().to_string(),
        }));
    }

    let head = &line[..stmt.start()];
    let tail = &line[stmt.end()..];
    if ZERO_LITERAL.is_match(init.as_str()) {
        return Some(Ok(format!("{}{};{}", head, binding.as_str(), tail)));
    }
    if !tail.trim().is_empty() || init.as_str().contains('{') {
        return Some(Err(SkipReason::ComplexInitializer));
    }
    Some(Ok(format!(
        "{}let _ = {}; {};",
        head,
        init.as_str(),
        binding.as_str()
    )))
}

/// Apply every record to a module's text. Line endings are preserved.
pub fn patch_text(text: &str, records: &BTreeMap<usize, WarningRecord>) -> PatchResult {
    let mut out = String::with_capacity(text.len() + records.len() * 4);
    let mut outcomes = Vec::with_capacity(records.len());
    let mut seen = 0;

    for (idx, raw) in text.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let Some(record) = records.get(&line_no) else {
            out.push_str(raw);
            continue;
        };
        seen += 1;

        let (body, ending) = split_ending(raw);
        match patch_line(body, record) {
            Ok(patched) => {
                out.push_str(&patched);
                out.push_str(ending);
                outcomes.push(EditOutcome::Applied {
                    line: line_no,
                    kind: record.kind,
                });
            }
            Err(reason) => {
                out.push_str(raw);
                outcomes.push(EditOutcome::Skipped {
                    line: line_no,
                    record: record.clone(),
                    reason,
                });
            }
        }
    }

    // Records pointing past the end of the file.
    if seen < records.len() {
        let line_count = text.split_inclusive('\n').count();
        for (&line_no, record) in records.range(line_count + 1..) {
            outcomes.push(EditOutcome::Skipped {
                line: line_no,
                record: record.clone(),
                reason: SkipReason::ColumnOutOfRange {
                    column: record.column,
                    width: 0,
                },
            });
        }
    }

    PatchResult {
        text: out,
        outcomes,
    }
}

/// Rewrite, in place, every file of `map` located under `dir`.
///
/// Paths in the map are as reported by the compiler, relative to `root`.
/// Each file is re-read from disk right before it is patched.
pub fn patch_dir(root: &Path, dir: &Path, map: &WarningMap) -> Result<Vec<FilePatch>> {
    let scope = root.join(dir);
    let mut patches = Vec::new();

    for (file, records) in map.files() {
        let path = root.join(file);
        if !path.starts_with(&scope) {
            continue;
        }

        let text = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
        let result = patch_text(&text, records);

        for outcome in result.skipped() {
            if let EditOutcome::Skipped {
                line,
                record,
                reason,
            } = outcome
            {
                warn!(
                    file = %file.display(),
                    line,
                    kind = %record.kind,
                    token = %record.token,
                    %reason,
                    "left for manual follow-up"
                );
            }
        }

        if result.text != text {
            std::fs::write(&path, &result.text)
                .wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
        }
        debug!(file = %file.display(), applied = result.applied(), "patched");

        patches.push(FilePatch {
            path: file.to_path_buf(),
            outcomes: result.outcomes,
        });
    }

    Ok(patches)
}

fn split_ending(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}

/// Byte offset of a 1-based character column.
fn byte_offset(line: &str, column: usize) -> Option<usize> {
    let idx = column.checked_sub(1)?;
    line.char_indices().nth(idx).map(|(offset, _)| offset)
}

fn expect_token(rest: &str, token: &str) -> Result<(), SkipReason> {
    let at_boundary = |after: &str| {
        after
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    };

    if let Some(after) = rest.strip_prefix(token)
        && at_boundary(after)
    {
        Ok(())
    } else {
        let found: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        Err(SkipReason::TokenMismatch {
            expected: token.to_string(),
            found,
        })
    }
}

/// Whether the text before a column ends in `let` or `let mut`.
fn is_let_binding(head: &str) -> bool {
    let mut words = head.split_whitespace().rev();
    match words.next() {
        Some("let") => true,
        Some("mut") => words.next() == Some("let"),
        _ => false,
    }
}
