/// Starter scour.toml written by `scour init`, set up for ring's C sources.
pub const STARTER_MANIFEST: &str = r#"[project]
descriptor = "compile_commands.json"
lint_rounds = 3

[compiler]
command = "cc"
object = "build/tmp.o"
args = ["-Iinclude", "-UOPENSSL_X86_64", "-U__x86_64"]

[tools]
translate = ["c2rust", "transpile"]
build = ["cargo", "build", "--target={target}"]
format = ["rustfmt"]

[normalize]
discard_calls = ["GFp_memcpy", "GFp_memset", "GFp_bn_from_montgomery_in_place"]

[sources]
units = [
    "crypto/fipsmodule/aes/aes_nohw.c",
    "crypto/fipsmodule/bn/montgomery.c",
    "crypto/fipsmodule/bn/montgomery_inv.c",
    "crypto/limbs/limbs.c",
    "crypto/mem.c",
    "crypto/poly1305/poly1305.c",
    "crypto/crypto.c",
    "crypto/curve25519/curve25519.c",
    "crypto/fipsmodule/ec_17/ecp_nistz.c",
    "crypto/fipsmodule/ec_17/gfp_p256.c",
    "crypto/fipsmodule/ec_17/gfp_p384.c",
    "crypto/fipsmodule/ec_17/p256.c",
]

[[targets]]
target = "riscv32imac-unknown-xous-elf"
args = ["-D__xous__", "-D__riscv", "-D__riscv_xlen=32", "-m32"]
output = "src/c2rust/xous"

[[targets]]
target = "wasm32-unknown-unknown"
args = ["-DOPENSSL_NO_ASM", "-D__wasm__", "-D__wasm32__", "-m32"]
output = "src/c2rust/wasm32"
skip_lint = true
"#;
