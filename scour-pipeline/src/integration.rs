//! Registration snippet for the generated module set.

use std::fmt::Write;

use scour_core::TargetProfile;

use crate::assemble::MODULE_EXTENSION;

/// Render the `mod c2rust { ... }` block that registers `modules` for one
/// target. Paths are relative to the parent of the output directory.
pub fn snippet<'a>(profile: &TargetProfile, modules: impl IntoIterator<Item = &'a str>) -> String {
    let leaf = profile.output_leaf();
    let mut out = String::new();

    let _ = writeln!(out, "#[cfg({})]", profile.cfg_guard());
    out.push_str("mod c2rust {\n");
    for module in modules {
        let _ = writeln!(out, "    #[path = \"{}/{}.{}\"]", leaf, module, MODULE_EXTENSION);
        let _ = writeln!(out, "    mod {};", module);
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet() {
        let profile = TargetProfile::new("riscv32imac-unknown-xous-elf", "src/c2rust/xous");

        insta::assert_snapshot!(snippet(&profile, ["mem", "limbs"]), @r#"
        #[cfg(target = "riscv32imac-unknown-xous-elf")]
        mod c2rust {
            #[path = "xous/mem.rs"]
            mod mem;
            #[path = "xous/limbs.rs"]
            mod limbs;
        }
        "#);
    }

    #[test]
    fn test_snippet_custom_guard() {
        let mut profile = TargetProfile::new("wasm32-unknown-unknown", "src/c2rust/wasm32");
        profile.cfg = Some("target_arch = \"wasm32\"".to_string());

        let out = snippet(&profile, ["mem"]);
        assert!(out.starts_with("#[cfg(target_arch = \"wasm32\")]\n"));
        assert!(out.contains("#[path = \"wasm32/mem.rs\"]"));
    }
}
