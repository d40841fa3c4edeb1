//! Build script for uBITX firmware
//!
//! Puts the project directory on the linker search path so that
//! `memory.x` is found when building for the target.

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }
}
