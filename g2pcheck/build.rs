// Adds the system library search paths espeak-rs-sys needs on Linux when the
// in-process binding is enabled. Its own build script does not emit the
// standard paths, which leaves libsonic and libpcaudio unresolved at link time.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if std::env::var_os("CARGO_FEATURE_ESPEAK_LIB").is_none() {
        return;
    }

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    if target_os == "linux" {
        println!("cargo:rustc-link-search=/usr/lib");
        println!("cargo:rustc-link-search=/usr/lib/x86_64-linux-gnu");
        println!("cargo:rustc-link-search=/usr/lib64");

        println!("cargo:rustc-link-lib=dylib=sonic");
        println!("cargo:rustc-link-lib=dylib=pcaudio");
    }

    if target_os == "macos" {
        println!("cargo:rustc-link-lib=c++");
    }
}
