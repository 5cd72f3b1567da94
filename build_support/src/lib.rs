//! Build script support for `binder_ndk_sys`.
//!
//! The NDK Binder headers assume `size_t`, `uint32_t` and friends are
//! already in scope. On hosts without a matching C library (Windows in
//! particular) the binding generator can not resolve them. This crate
//! renders a type shim sized for the actual target and a wrapper that
//! includes everything in the right order, locates the NDK and runs
//! bindgen.

use std::{fs, path::Path};

use ::log::{debug, info, warn};

pub mod bindings;
pub mod cargo;
mod clang;
mod config;
mod error;
pub mod log;
pub mod ndk;
mod shim;
mod stub;
mod target;
pub mod toolchain;
mod wrapper;

pub use clang::*;
pub use config::*;
pub use error::*;
pub use shim::*;
pub use stub::*;
pub use target::*;
pub use wrapper::*;

use crate::{error::IoResultExt, log::OkLog, ndk::Ndk};

pub type Result<T> = std::result::Result<T, Error>;

/// Writes the type shim and the wrapper header into the generated include
/// directory. Headers that are already up to date keep their timestamps.
pub fn write_headers(config: &BuildConfig) -> Result<()> {
    let include_dir = config.include_dir();
    fs::create_dir_all(&include_dir).with_path(&include_dir)?;
    if TypeShim::new(config.pointer_width).write_to(&include_dir.join(SHIM_HEADER))? {
        info!(
            "Wrote {}-bit type shim to {}",
            config.pointer_width.bits(),
            include_dir.display()
        );
    }
    InclusionWrapper::new(&config.vendor_header).write_to(&include_dir.join(WRAPPER_HEADER))?;
    Ok(())
}

/// Writes `contents` unless the file already holds exactly that. Returns
/// whether the file was written.
///
/// Generated headers are tracked with `rerun-if-changed`; touching them
/// on every run would make the build script run on every build.
pub(crate) fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    if fs::read(path).is_ok_and(|existing| existing == contents.as_bytes()) {
        debug!("{} is up to date", path.display());
        return Ok(false);
    }
    fs::write(path, contents).with_path(path)?;
    Ok(true)
}

/// Everything the `binder_ndk_sys` build script does.
pub fn run(config: &BuildConfig) -> Result<()> {
    cargo::rerun_if_changed(&config.vendor_header);
    cargo::rerun_if_changed(&config.symbols_file());
    for name in TRACKED_ENV_VARS {
        cargo::rerun_if_env_changed(name);
    }
    for name in extra_clang_args_vars(&config.target) {
        cargo::rerun_if_env_changed(&name);
    }

    if config.stub {
        StubLibrary::from_symbols_file(STUB_LIBRARY, &config.symbols_file())?.build(config)?;
    }

    let ndk = Ndk::detect(config.ndk_candidates.iter().cloned(), config.host);
    match &ndk {
        Some(ndk) => {
            let targets = toolchain::link_targets(config.abi().filter(|_| config.is_android()));
            toolchain::repair_links(&ndk.bin_dir(), &targets).ok_log();
        }
        None => info!("Android NDK not found, relying on system headers"),
    }

    write_headers(config)?;

    let out = config.bindings_path();
    if config.vendor_header.is_file() {
        let invocation = ClangInvocation::new(config, ndk.as_ref());
        bindings::generate(&invocation, &out)?;
        info!("Bindings written to {}", out.display());
    } else {
        warn!(
            "{} not found, generating empty bindings",
            config.vendor_header.display()
        );
        bindings::write_placeholder(&out)?;
    }
    Ok(())
}
