//! Context-free normalization of raw translator output.
//!
//! Every rule looks at a single line. Unknown constructs pass through
//! untouched and surface later as compiler errors.

use std::sync::LazyLock;

use regex::Regex;
use scour_core::DEFAULT_DISCARD_CALLS;

/// Translator scaffolding dropped when a line matches exactly.
const DROP_EXACT: &[&str] = &["#![register_tool(c2rust)]", "use core::arch::asm;"];

/// Crate-level attributes dropped by prefix; the assembler writes its own prologue.
const DROP_PREFIX: &[&str] = &["#![feature(", "#![allow("];

/// Platform-width aliases from `std::os::raw`.
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("std::os::raw::c_int", "i32"),
    ("std::os::raw::c_ulonglong", "u64"),
    ("std::os::raw::c_longlong", "i64"),
    ("std::os::raw::c_uint", "u32"),
    ("std::os::raw::c_char", "u8"),
    ("std::os::raw::c_uchar", "u8"),
    ("std::os::raw::c_schar", "i8"),
    ("std::os::raw::c_void", "u8"),
];

/// `std`/`libc` paths rewritten to `core`. Order matters: the long-long
/// aliases must be replaced before `c_ulong`/`c_long`, which are prefixes.
const NAMESPACE_REWRITES: &[(&str, &str)] = &[
    ("::std::mem::transmute", "core::mem::transmute"),
    ("libc::c_char", "core::ffi::c_char"),
    ("libc::c_schar", "core::ffi::c_schar"),
    ("libc::c_uchar", "core::ffi::c_uchar"),
    ("libc::c_int", "core::ffi::c_int"),
    ("libc::c_uint", "core::ffi::c_uint"),
    ("libc::c_ulonglong", "u64"),
    ("libc::c_longlong", "i64"),
    ("libc::c_ulong", "u32"),
    ("libc::c_long", "i32"),
    ("libc::c_void", "core::ffi::c_void"),
];

/// Heap and runtime paths that only exist in `std`.
const RUNTIME_REWRITES: &[(&str, &str)] = &[
    ("::std::mem::size_of", "core::mem::size_of"),
    ("::std::vec::", "alloc::vec::"),
    (": Vec::", ": alloc::vec::Vec::"),
    ("use std::arch::asm;", ""),
];

/// Empty inline assembly used by the C sources as an optimization barrier.
const ASM_BARRIER: &str =
    r#"asm!("", inlateout(reg) a, options(preserves_flags, pure, readonly, att_syntax));"#;

const COMPILER_FENCE: &str =
    "core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);";

/// `(size_of::<T>() )as u64`, every occurrence on the line
static SIZE_OF_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:core|std)::mem::size_of::<.*?>\(\)\s*)as u64\b").unwrap()
});

static DEFAULT: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// Normalize one line with the default rule set.
pub fn normalize_line(line: &str) -> String {
    DEFAULT.normalize_line(line)
}

/// Line normalizer.
///
/// The rule set is fixed; only the list of calls whose result gets discarded
/// is configurable.
#[derive(Debug, Clone)]
pub struct Normalizer {
    discard_calls: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_discard_calls(DEFAULT_DISCARD_CALLS.iter().copied())
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_discard_calls(calls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            discard_calls: calls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn discard_calls(&self) -> &[String] {
        &self.discard_calls
    }

    /// Rewrite a single raw line.
    ///
    /// The returned line is trimmed. An empty result means the line was
    /// scaffolding and is dropped (written out as a blank line).
    pub fn normalize_line(&self, line: &str) -> String {
        let line = line.trim();

        if DROP_EXACT.contains(&line) || DROP_PREFIX.iter().any(|p| line.starts_with(p)) {
            return String::new();
        }

        let mut line = line.to_string();
        replace_all(&mut line, TYPE_ALIASES);
        replace_all(&mut line, NAMESPACE_REWRITES);

        if let Some(call) = self
            .discard_calls
            .iter()
            .find(|call| line.strip_suffix('(') == Some(call.as_str()))
        {
            line = format!("let _ = {}(", call);
        }

        replace_all(&mut line, RUNTIME_REWRITES);

        if SIZE_OF_WIDTH.is_match(&line) {
            line = SIZE_OF_WIDTH.replace_all(&line, "${1}as u32").into_owned();
        }

        line.replace(ASM_BARRIER, COMPILER_FENCE)
    }

    /// Normalize every line of a raw module. Dropped lines stay as blank lines
    /// so the output has one line per input line.
    pub fn normalize_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            out.push_str(&self.normalize_line(line));
            out.push('\n');
        }
        out
    }
}

fn replace_all(line: &mut String, rules: &[(&str, &str)]) {
    for (from, to) in rules {
        if line.contains(from) {
            *line = line.replace(from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_discard_calls() {
        assert_eq!(Normalizer::new().discard_calls(), DEFAULT_DISCARD_CALLS);
    }

    #[test]
    fn test_drop_scaffolding() {
        for line in [
            "#![register_tool(c2rust)]",
            "use core::arch::asm;",
            "#![feature(asm)]",
            "#![allow(dead_code, mutable_transmutes, non_camel_case_types)]",
            "  #![allow(unused_assignments)]  ",
        ] {
            assert_eq!(normalize_line(line), "", "line {:?} should be dropped", line);
        }
    }

    #[test]
    fn test_trims_and_passes_through() {
        assert_eq!(normalize_line("    let x = y + 1;\n"), "let x = y + 1;");
        assert_eq!(normalize_line(""), "");
    }

    #[test]
    fn test_type_narrowing() {
        assert_eq!(
            normalize_line("pub type size_t = std::os::raw::c_uint;"),
            "pub type size_t = u32;"
        );
        assert_eq!(
            normalize_line("fn f(p: *mut std::os::raw::c_void, n: std::os::raw::c_int)"),
            "fn f(p: *mut u8, n: i32)"
        );
        assert_eq!(
            normalize_line("let c: std::os::raw::c_schar = 0;"),
            "let c: i8 = 0;"
        );
    }

    #[test]
    fn test_libc_to_core() {
        assert_eq!(
            normalize_line("pub type uint8_t = libc::c_uchar;"),
            "pub type uint8_t = core::ffi::c_uchar;"
        );
        assert_eq!(
            normalize_line("r: *mut libc::c_void,"),
            "r: *mut core::ffi::c_void,"
        );
    }

    #[test]
    fn test_long_long_before_long() {
        let out = normalize_line("pub type uint64_t = libc::c_ulonglong;");
        assert_eq!(out, "pub type uint64_t = u64;");
        assert!(!out.contains("c_ulong"));

        let out = normalize_line("let a: libc::c_longlong = b as libc::c_long;");
        assert_eq!(out, "let a: i64 = b as i32;");
        assert!(!out.contains("c_long"));

        assert_eq!(
            normalize_line("pub type crypto_word = libc::c_ulong;"),
            "pub type crypto_word = u32;"
        );
    }

    #[test]
    fn test_discard_calls() {
        assert_eq!(normalize_line("GFp_memcpy("), "let _ = GFp_memcpy(");
        assert_eq!(normalize_line("    GFp_memset("), "let _ = GFp_memset(");
        assert_eq!(
            normalize_line("GFp_bn_from_montgomery_in_place("),
            "let _ = GFp_bn_from_montgomery_in_place("
        );
        // only bare statements are guarded
        assert_eq!(
            normalize_line("let r = GFp_memcpy(dst, src, n);"),
            "let r = GFp_memcpy(dst, src, n);"
        );
    }

    #[test]
    fn test_custom_discard_calls() {
        let normalizer = Normalizer::with_discard_calls(["LIMBS_copy"]);
        assert_eq!(normalizer.normalize_line("LIMBS_copy("), "let _ = LIMBS_copy(");
        assert_eq!(normalizer.normalize_line("GFp_memcpy("), "GFp_memcpy(");
    }

    #[test]
    fn test_runtime_rewrites() {
        assert_eq!(
            normalize_line("let v: Vec::<u8> = ::std::vec::Vec::new();"),
            "let v: alloc::vec::Vec::<u8> = alloc::vec::Vec::new();"
        );
        assert_eq!(
            normalize_line("let mut v: Vec::<u32> = x;"),
            "let mut v: alloc::vec::Vec::<u32> = x;"
        );
        assert_eq!(normalize_line("use std::arch::asm;"), "");
    }

    #[test]
    fn test_size_of_width() {
        assert_eq!(
            normalize_line("(n as u64).wrapping_mul(std::mem::size_of::<T>() as u64) as usize"),
            "(n as u64).wrapping_mul(std::mem::size_of::<T>() as u32) as usize"
        );
        assert_eq!(
            normalize_line(
                "n.wrapping_mul(::std::mem::size_of::<Limb>() as u64) as size_t,"
            ),
            "n.wrapping_mul(core::mem::size_of::<Limb>() as u32) as size_t,"
        );
    }

    #[test]
    fn test_size_of_width_every_occurrence() {
        let line = "let n: libc::c_ulong = (::std::mem::size_of::<A>() as u64)\
                    .wrapping_add(::std::mem::size_of::<B>() as u64);";
        let once = normalize_line(line);
        assert_eq!(
            once,
            "let n: u32 = (core::mem::size_of::<A>() as u32)\
             .wrapping_add(core::mem::size_of::<B>() as u32);"
        );
        assert_eq!(normalize_line(&once), once);
    }

    #[test]
    fn test_size_of_width_noop() {
        let line = "let n = core::mem::size_of::<Limb>() as usize;";
        assert_eq!(normalize_line(line), line);

        let line = "let n = x as u64;";
        assert_eq!(normalize_line(line), line);
    }

    #[test]
    fn test_asm_barrier() {
        assert_eq!(
            normalize_line(
                r#"asm!("", inlateout(reg) a, options(preserves_flags, pure, readonly, att_syntax));"#
            ),
            "core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);"
        );
    }

    #[test]
    fn test_idempotent() {
        let lines = [
            "pub type uint64_t = libc::c_ulonglong;",
            "pub type size_t = libc::c_ulong;",
            "x: *const std::os::raw::c_void,",
            "GFp_memcpy(",
            "n.wrapping_mul(::std::mem::size_of::<Limb>() as u64)",
            "let v = ::std::vec::from_elem(0, n);",
            "let v: Vec::<u8> = Vec::new();",
            "unsafe { ::std::mem::transmute::<[u8; 4], u32>(b) }",
            r#"asm!("", inlateout(reg) a, options(preserves_flags, pure, readonly, att_syntax));"#,
        ];
        for line in lines {
            let once = normalize_line(line);
            assert_eq!(normalize_line(&once), once, "not idempotent: {:?}", line);
        }
    }

    #[test]
    fn test_normalize_text_keeps_line_count() {
        let raw = "#![allow(dead_code)]\n#![register_tool(c2rust)]\n    pub type limb = libc::c_uint;\n";
        let out = Normalizer::new().normalize_text(raw);
        assert_eq!(out, "\n\npub type limb = core::ffi::c_uint;\n");
    }
}
