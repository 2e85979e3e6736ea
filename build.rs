fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=csrc/protect.c");

    // Without the `mupdf` feature nothing native is built or linked.
    #[cfg(feature = "mupdf")]
    build_trampolines();
}

/// Compile `csrc/protect.c` and link MuPDF.
///
/// Lookup:
///   1. MUPDF_INCLUDE_DIR / MUPDF_LIB_DIR  (explicit override)
///   2. the system compiler and linker search paths
#[cfg(feature = "mupdf")]
fn build_trampolines() {
    use std::env;
    use std::path::PathBuf;

    let mut build = cc::Build::new();
    build.file("csrc/protect.c").warnings(true);

    if let Ok(dir) = env::var("MUPDF_INCLUDE_DIR") {
        let dir = PathBuf::from(dir);
        if !dir.exists() {
            panic!(
                "faster-raster: MUPDF_INCLUDE_DIR does not exist: {}",
                dir.display()
            );
        }
        build.include(dir);
    }
    build.compile("faster_raster_protect");

    if let Ok(dir) = env::var("MUPDF_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
    println!("cargo:rustc-link-lib=mupdf");
    println!("cargo:rustc-link-lib=mupdf-third");

    println!("cargo:rerun-if-env-changed=MUPDF_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=MUPDF_LIB_DIR");
}
