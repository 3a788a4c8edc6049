//! Normalization followed by diagnostic-driven patching on a realistic module.

use std::path::Path;

use scour_rewrite::{
    EditOutcome, Normalizer, WarningKind, parse_diagnostics, patch_dir, patch_text,
};
use tempfile::TempDir;

const RAW_LIMBS: &str = r#"#![allow(dead_code, mutable_transmutes, non_camel_case_types, non_snake_case,
#![register_tool(c2rust)]
#![feature(asm, register_tool)]
use core::arch::asm;
pub type size_t = libc::c_ulong;
pub type uint64_t = libc::c_ulonglong;
pub type Limb = crypto_word;
pub type crypto_word = uint64_t;
#[no_mangle]
pub unsafe extern "C" fn LIMBS_add_mod(
    mut r: *mut Limb,
    mut a: *const Limb,
    num_limbs: size_t,
) {
    let mut carry: Limb = 0 as libc::c_int as Limb;
    let mut i: size_t = 0;
    carry = 1;
    GFp_memset(
        r as *mut libc::c_void,
        0 as libc::c_int,
        num_limbs.wrapping_mul(::std::mem::size_of::<Limb>() as u64) as size_t,
    );
}
unsafe extern "C" fn limbs_reduce_once(mut r: *mut Limb) {}
"#;

/// Compiler output for the normalized module above (3-line prologue not included).
const BUILD_OUTPUT: &str = r#"warning: unused variable: `num_limbs`
  --> src/c2rust/xous/limbs.rs:13:1
   |
13 | num_limbs: size_t,
   | ^^^^^^^^^ help: if this is intentional, prefix it with an underscore: `_num_limbs`

warning: value assigned to `carry` is never read
  --> src/c2rust/xous/limbs.rs:15:23
   |
15 | let mut carry: Limb = 0 as core::ffi::c_int as Limb;
   |                       ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
   |
   = help: maybe it is overwritten before being read?

warning: variable does not need to be mutable
  --> src/c2rust/xous/limbs.rs:11:1
   |
11 | mut r: *mut Limb,
   | ----^
   | |
   | help: remove this `mut`

warning: variable does not need to be mutable
  --> src/c2rust/xous/limbs.rs:16:5
   |
16 | let mut i: size_t = 0;
   |     ----^
   |     |
   |     help: remove this `mut`

warning: function `limbs_reduce_once` is never used
  --> src/c2rust/xous/limbs.rs:24:22
   |
24 | unsafe extern "C" fn limbs_reduce_once(mut r: *mut Limb) {}
   |                      ^^^^^^^^^^^^^^^^^

warning: `ring` (lib) generated 5 warnings
"#;

fn normalized() -> String {
    Normalizer::new().normalize_text(RAW_LIMBS)
}

#[test]
fn normalized_module_is_portable() {
    let text = normalized();

    assert!(!text.contains("libc::"));
    assert!(!text.contains("#![feature"));
    assert!(!text.contains("register_tool"));
    assert!(text.contains("pub type size_t = u32;"));
    assert!(text.contains("pub type uint64_t = u64;"));
    assert!(text.contains("core::mem::size_of::<Limb>() as u32"));
    assert_eq!(text.lines().count(), RAW_LIMBS.lines().count());
}

#[test]
fn normalization_is_idempotent() {
    let normalizer = Normalizer::new();
    let once = normalizer.normalize_text(RAW_LIMBS);
    assert_eq!(normalizer.normalize_text(&once), once);
}

#[test]
fn every_reported_warning_is_patched() {
    let text = normalized();
    let map = parse_diagnostics(BUILD_OUTPUT);
    assert_eq!(map.len(), 5);
    assert_eq!(map.count(WarningKind::RemovableMut), 2);

    let records = map.file(Path::new("src/c2rust/xous/limbs.rs")).unwrap();
    let result = patch_text(&text, records);

    assert_eq!(result.applied(), 5, "skipped: {:?}", result.skipped().collect::<Vec<_>>());
    let lines: Vec<_> = result.text.lines().collect();
    assert_eq!(lines[10], "r: *mut Limb,");
    assert_eq!(lines[12], "_num_limbs: size_t,");
    assert_eq!(lines[14], "let mut carry: Limb;");
    assert_eq!(lines[15], "let i: size_t = 0;");
    assert_eq!(
        lines[23],
        "unsafe extern \"C\" fn _limbs_reduce_once(mut r: *mut Limb) {}"
    );
}

#[test]
fn residues_do_not_grow_across_rounds() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let module = root.join("src/c2rust/xous/limbs.rs");
    std::fs::create_dir_all(module.parent().unwrap()).unwrap();
    std::fs::write(&module, normalized()).unwrap();

    // What the compiler reports after each round of edits.
    let rounds = [
        BUILD_OUTPUT,
        "warning: variable does not need to be mutable\n  --> src/c2rust/xous/limbs.rs:12:1\n",
        "",
    ];

    let mut residues = Vec::new();
    for output in rounds {
        let map = parse_diagnostics(output);
        residues.push(map.len());
        let patches = patch_dir(root, Path::new("src/c2rust/xous"), &map).unwrap();
        assert!(patches.iter().all(|p| p.skipped() == 0));
    }

    assert_eq!(residues, [5, 1, 0]);
    assert!(residues.windows(2).all(|w| w[1] <= w[0]));

    let text = std::fs::read_to_string(&module).unwrap();
    assert!(text.contains("\na: *const Limb,\n"));
    assert_eq!(text.matches("_num_limbs").count(), 1);
}

#[test]
fn replayed_output_never_double_prefixes() {
    let text = normalized();
    let map = parse_diagnostics(BUILD_OUTPUT);
    let records = map.file(Path::new("src/c2rust/xous/limbs.rs")).unwrap();

    let once = patch_text(&text, records);
    let twice = patch_text(&once.text, records);

    assert!(!twice.text.contains("__num_limbs"));
    assert!(!twice.text.contains("__limbs_reduce_once"));
    assert!(twice.skipped().count() >= 4);
}

#[test]
fn stale_coordinates_are_reported_not_applied() {
    let text = "let n = 1;\n";
    let map = parse_diagnostics("warning: unused variable: `m`\n --> a.rs:1:5\n");
    let result = patch_text(text, map.file(Path::new("a.rs")).unwrap());

    assert_eq!(result.text, text);
    assert!(matches!(
        result.outcomes.as_slice(),
        [EditOutcome::Skipped { line: 1, .. }]
    ));
}

#[test]
fn unread_initializers_keep_their_bindings() {
    let text = "fn f(a: u32) -> u32 {\n    let mut r: u32 = a;\n    let mut p: *mut u32 = 0 as *mut u32;\n    r = 1;\n    p = core::ptr::null_mut();\n    r\n}\n";
    let output = r#"warning: value assigned to `r` is never read
 --> m.rs:2:22
  |
2 |     let mut r: u32 = a;
  |                      ^
  |
  = help: maybe it is overwritten before being read?

warning: value assigned to `p` is never read
 --> m.rs:3:27
  |
3 |     let mut p: *mut u32 = 0 as *mut u32;
  |                           ^^^^^^^^^^^^^
"#;
    let map = parse_diagnostics(output);
    let result = patch_text(text, map.file(Path::new("m.rs")).unwrap());

    assert_eq!(result.applied(), 2);
    let lines: Vec<_> = result.text.lines().collect();
    assert_eq!(lines[1], "    let _ = a; let mut r: u32;");
    assert_eq!(lines[2], "    let mut p: *mut u32;");
    assert_eq!(lines[3], "    r = 1;");
}
