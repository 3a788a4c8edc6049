//! Scanner for human-readable compiler diagnostics.
//!
//! Only four warning kinds are understood. Every other diagnostic is skipped,
//! and malformed text never produces an error.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use indexmap::IndexMap;
use regex::Regex;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-->\s*(.+):(\d+):(\d+)\s*$").unwrap());

/// The warning classes the patcher knows how to silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// `value assigned to `x` is never read`
    UnusedInit,
    /// `unused variable: `x``
    UnusedVariable,
    /// `variable does not need to be mutable`
    RemovableMut,
    /// `function `f` is never used`
    UnusedFunction,
}

impl WarningKind {
    pub const ALL: [WarningKind; 4] = [
        WarningKind::UnusedInit,
        WarningKind::UnusedVariable,
        WarningKind::RemovableMut,
        WarningKind::UnusedFunction,
    ];

    /// Classify a `warning:` header line. Returns the kind and the implicated
    /// token, or `None` for anything unhandled.
    fn classify(header: &str) -> Option<(Self, String)> {
        let kind = if header.contains("value assigned to") && header.contains("is never read") {
            WarningKind::UnusedInit
        } else if header.contains("unused variable") {
            WarningKind::UnusedVariable
        } else if header.contains("variable does not need to be mutable") {
            return Some((WarningKind::RemovableMut, "mut".to_string()));
        } else if header.contains("function") && header.contains("is never used") {
            WarningKind::UnusedFunction
        } else {
            return None;
        };

        let token = TOKEN.captures(header)?.get(1)?.as_str().to_string();
        Some((kind, token))
    }
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::UnusedInit => write!(f, "unused-init"),
            WarningKind::UnusedVariable => write!(f, "unused-variable"),
            WarningKind::RemovableMut => write!(f, "removable-mutability"),
            WarningKind::UnusedFunction => write!(f, "unused-function"),
        }
    }
}

/// One actionable warning, keyed by file and line in a [`WarningMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningRecord {
    pub kind: WarningKind,
    /// Identifier or literal the warning points at.
    pub token: String,
    /// 1-based character column reported by the compiler.
    pub column: usize,
}

impl WarningRecord {
    pub fn new(kind: WarningKind, token: impl Into<String>, column: usize) -> Self {
        Self {
            kind,
            token: token.into(),
            column,
        }
    }
}

/// Warnings per file, then per line. At most one record per line: a later
/// diagnostic for the same line replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningMap {
    files: IndexMap<PathBuf, BTreeMap<usize, WarningRecord>>,
}

impl WarningMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, replacing whatever was recorded for that line.
    pub fn insert(&mut self, file: impl Into<PathBuf>, line: usize, record: WarningRecord) {
        self.files
            .entry(file.into())
            .or_default()
            .insert(line, record);
    }

    pub fn get(&self, file: &Path, line: usize) -> Option<&WarningRecord> {
        self.files.get(file)?.get(&line)
    }

    /// Records for one file, ordered by line.
    pub fn file(&self, file: &Path) -> Option<&BTreeMap<usize, WarningRecord>> {
        self.files.get(file)
    }

    /// Files in the order they first appeared in the compiler output.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &BTreeMap<usize, WarningRecord>)> {
        self.files.iter().map(|(path, lines)| (path.as_path(), lines))
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.files
            .values()
            .flat_map(BTreeMap::values)
            .filter(|record| record.kind == kind)
            .count()
    }

    /// Keep only the files located under `dir`, re-keyed relative to the
    /// directory `dir` is relative to.
    ///
    /// `dir` may appear anywhere in a reported path, compared component-wise:
    /// a crate built as a workspace member reports `ring/src/c2rust/xous/a.rs`
    /// for the module `src/c2rust/xous/a.rs`.
    pub fn under(&self, dir: &Path) -> WarningMap {
        let mut scoped = WarningMap::new();
        for (path, lines) in &self.files {
            if let Some(local) = locate_under(path, dir) {
                let entry = scoped.files.entry(local).or_default();
                entry.extend(lines.iter().map(|(line, record)| (*line, record.clone())));
            }
        }
        scoped
    }
}

/// The tail of `path` that starts with `dir`, if any.
fn locate_under(path: &Path, dir: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    loop {
        let rest = components.as_path();
        if rest.starts_with(dir) {
            return Some(rest.to_path_buf());
        }
        components.next()?;
    }
}

/// Scanner state between lines.
#[derive(Debug)]
enum ScanState {
    Searching,
    Found { kind: WarningKind, token: String },
}

/// Parse the combined stdout/stderr of one compiler run.
pub fn parse_diagnostics(output: &str) -> WarningMap {
    let mut map = WarningMap::new();
    let mut state = ScanState::Searching;

    for line in output.lines() {
        if line.starts_with("warning") || line.starts_with("error") {
            state = match line.strip_prefix("warning:").and_then(WarningKind::classify) {
                Some((kind, token)) => ScanState::Found { kind, token },
                None => ScanState::Searching,
            };
            continue;
        }

        if let ScanState::Found { kind, token } = &state {
            if let Some((file, line_no, column)) = parse_location(line) {
                map.insert(file, line_no, WarningRecord::new(*kind, token.clone(), column));
                state = ScanState::Searching;
            }
        }
    }

    map
}

fn parse_location(line: &str) -> Option<(PathBuf, usize, usize)> {
    let caps = LOCATION.captures(line)?;
    let file = PathBuf::from(caps[1].trim());
    let line_no = caps[2].parse().ok()?;
    let column = caps[3].parse().ok()?;
    Some((file, line_no, column))
}
