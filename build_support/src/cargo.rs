//! Build script directives understood by cargo.

use std::path::Path;

pub fn rerun_if_changed(path: &Path) {
    println!("cargo:rerun-if-changed={}", path.display());
}

pub fn rerun_if_env_changed(name: &str) {
    println!("cargo:rerun-if-env-changed={name}");
}

pub fn rustc_link_search(path: &Path) {
    println!("cargo:rustc-link-search=native={}", path.display());
}

pub fn rustc_link_lib(name: &str) {
    println!("cargo:rustc-link-lib=dylib={name}");
}
