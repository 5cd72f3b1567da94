//! Recent NDKs only ship API-versioned compiler drivers such as
//! `aarch64-linux-android33-clang`. Tools like `cc` look for the
//! unversioned `aarch64-linux-android-clang`, so those are created here.

use std::{fs, io, path::Path};

use ::log::{info, warn};

use crate::{error::IoResultExt, AndroidAbi, Result};

const EXTENSIONS: [&str; 3] = [".exe", ".cmd", ""];

/// Compiler driver prefixes to repair. When the build target is not an
/// Android target all of them are processed.
pub fn link_targets(abi: Option<AndroidAbi>) -> Vec<&'static str> {
    match abi {
        Some(abi) => vec![abi.clang_triple()],
        None => AndroidAbi::ALL.iter().map(|a| a.clang_triple()).collect(),
    }
}

/// Versioned clang driver with the highest API level for given target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedClang {
    pub file_name: String,
    pub api_level: u32,
    pub extension: &'static str,
}

pub fn find_versioned_clang(bin_dir: &Path, target: &str) -> Result<Option<VersionedClang>> {
    let mut best: Option<VersionedClang> = None;
    for entry in fs::read_dir(bin_dir).with_path(bin_dir)?.flatten() {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if let Some(candidate) = parse_versioned_clang(&file_name, target) {
            if best
                .as_ref()
                .map_or(true, |b| candidate.api_level > b.api_level)
            {
                best = Some(candidate);
            }
        }
    }
    Ok(best)
}

fn parse_versioned_clang(file_name: &str, target: &str) -> Option<VersionedClang> {
    let rest = file_name.strip_prefix(target)?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let suffix = rest[digits.len()..].strip_prefix("-clang")?;
    let extension = EXTENSIONS.into_iter().find(|ext| suffix == *ext)?;
    Some(VersionedClang {
        file_name: file_name.to_owned(),
        api_level: digits.parse().ok()?,
        extension,
    })
}

/// Creates unversioned `<target>-clang` and `<target>-ar` links in the NDK
/// bin directory. Returns names of links that were created.
pub fn repair_links(bin_dir: &Path, targets: &[&str]) -> Result<Vec<String>> {
    if !bin_dir.is_dir() {
        warn!("Toolchain directory does not exist: {}", bin_dir.display());
        return Ok(Vec::new());
    }
    info!("Checking toolchain links in {}", bin_dir.display());

    let mut created = Vec::new();
    for target in targets {
        match find_versioned_clang(bin_dir, target)? {
            Some(clang) => {
                let link = format!("{target}-clang{}", clang.extension);
                if ensure_link(bin_dir, &clang.file_name, &link)? {
                    created.push(link);
                }
            }
            None => warn!("No clang compiler found for {target}"),
        }
    }

    let ar = EXTENSIONS
        .into_iter()
        .map(|ext| (ext, format!("llvm-ar{ext}")))
        .find(|(_, name)| bin_dir.join(name).exists());
    match ar {
        Some((extension, ar_name)) => {
            for target in targets {
                let link = format!("{target}-ar{extension}");
                if ensure_link(bin_dir, &ar_name, &link)? {
                    created.push(link);
                }
            }
        }
        None => warn!("llvm-ar not found in {}", bin_dir.display()),
    }

    Ok(created)
}

fn ensure_link(bin_dir: &Path, source: &str, link: &str) -> Result<bool> {
    let link_path = bin_dir.join(link);
    if link_path.exists() {
        info!("Toolchain link already exists: {link}");
        return Ok(false);
    }
    info!("Creating toolchain link: {link} -> {source}");
    let source_path = bin_dir.join(source);
    if symlink_file(&source_path, &link_path).is_err() {
        fs::copy(&source_path, &link_path).with_path(&link_path)?;
    }
    Ok(true)
}

#[cfg(unix)]
fn symlink_file(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

// Needs developer mode or elevated rights, hence the copy fallback.
#[cfg(windows)]
fn symlink_file(source: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink_file(_source: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this host",
    ))
}
