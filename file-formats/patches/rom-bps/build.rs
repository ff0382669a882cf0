//! Build script for rom-bps
//!
//! Embeds the revision conversion patches found under `assets/` as byte
//! constants in `$OUT_DIR/assets.rs`. A missing asset becomes `None` so the
//! crate still builds from a checkout without the binary files.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

/// (constant name, path below `assets/`)
const ASSETS: &[(&str, &str)] = &[
    ("REV_0_TO_REV_A", "smb2/Rev0ToRevA.bps"),
    ("REV_A_TO_REV_0", "smb2/RevAToRev0.bps"),
];

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let assets_dir = manifest_dir.join("assets");

    let mut code = String::from("// AUTO-GENERATED by build.rs, DO NOT EDIT MANUALLY\n\n");

    for (name, file) in ASSETS {
        let path = assets_dir.join(file);

        if path.is_file() {
            writeln!(
                code,
                "pub(crate) const {name}: Option<&[u8]> = Some(include_bytes!({:?}));",
                path.display().to_string()
            )
            .expect("writing to a String cannot fail");
        } else {
            println!(
                "cargo:warning=Conversion patch {} not found; that conversion will be skipped",
                path.display()
            );
            writeln!(code, "pub(crate) const {name}: Option<&[u8]> = None;")
                .expect("writing to a String cannot fail");
        }
    }

    fs::write(out_dir.join("assets.rs"), code).expect("Failed to write generated assets.rs");

    println!("cargo:rerun-if-changed=assets");
    println!("cargo:rerun-if-changed=build.rs");
}
