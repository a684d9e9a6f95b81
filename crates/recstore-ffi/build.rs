//! Generates `include/recstore.h` from the `extern "C"` surface.

use std::env;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let root = Path::new(&crate_dir);

    let config = cbindgen::Config::from_file(root.join("cbindgen.toml"))
        .expect("cbindgen.toml is readable");
    let include_dir = root.join("include");
    std::fs::create_dir_all(&include_dir).expect("include/ can be created");

    match cbindgen::generate_with_config(root, config) {
        Ok(bindings) => {
            bindings.write_to_file(include_dir.join("recstore.h"));
        }
        Err(e) => panic!("header generation failed: {e}"),
    }
}
