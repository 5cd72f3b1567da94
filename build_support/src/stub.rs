//! Stub `libbinder_ndk` for linking on hosts that do not have the real
//! library. Every exported function is empty; the real library is
//! resolved on the device at runtime.

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use ::log::info;

use crate::{cargo, error::IoResultExt, BuildConfig, Error, Result};

pub const STUB_LIBRARY: &str = "binder_ndk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubLibrary {
    name: String,
    symbols: Vec<String>,
}

impl StubLibrary {
    /// Parses symbol list: one symbol per line, `#` starts a comment.
    /// Duplicates are dropped.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut symbols: Vec<String> = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let symbol = line.split('#').next().unwrap_or_default().trim();
            if symbol.is_empty() {
                continue;
            }
            if !is_c_identifier(symbol) {
                return Err(Error::InvalidSymbol {
                    line: index + 1,
                    symbol: symbol.into(),
                });
            }
            if !symbols.iter().any(|s| s == symbol) {
                symbols.push(symbol.into());
            }
        }
        Ok(Self {
            name: name.into(),
            symbols,
        })
    }

    pub fn from_symbols_file(name: &str, path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_path(path)?;
        Self::parse(name, &text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn cargo_manifest(&self) -> String {
        format!(
            r#"[package]
name = "{}"
authors = ["Android"]
version = "1.0.0"
edition = "2021"
rust-version = "1.67"

[lib]
crate-type = ["cdylib"]

[workspace]
"#,
            self.name
        )
    }

    pub fn lib_source(&self) -> String {
        self.symbols
            .iter()
            .map(|symbol| format!("#[no_mangle]\npub extern \"C\" fn {symbol}() {{}}\n"))
            .collect()
    }

    /// Writes the stub crate into `dir`, replacing previous contents.
    /// Returns path of its manifest.
    pub fn write_project(&self, dir: &Path) -> Result<PathBuf> {
        if dir.exists() {
            fs::remove_dir_all(dir).with_path(dir)?;
        }
        let src = dir.join("src");
        fs::create_dir_all(&src).with_path(&src)?;

        let manifest = dir.join("Cargo.toml");
        fs::write(&manifest, self.cargo_manifest()).with_path(&manifest)?;
        let lib = src.join("lib.rs");
        fs::write(&lib, self.lib_source()).with_path(&lib)?;
        Ok(manifest)
    }

    /// Builds the stub for the current target and tells cargo to link
    /// against it.
    pub fn build(&self, config: &BuildConfig) -> Result<()> {
        let project = config.out_dir.join(format!("lib{}", self.name));
        let manifest = self.write_project(&project)?;
        info!(
            "Building stub lib{} with {} symbols",
            self.name,
            self.symbols.len()
        );

        let status = Command::new(&config.cargo)
            .arg("build")
            .arg("--target")
            .arg(&config.target)
            .arg("--manifest-path")
            .arg(&manifest)
            .arg("--target-dir")
            .arg(&config.out_dir)
            .current_dir(&project)
            .status()
            .with_path(&config.cargo)?;
        if !status.success() {
            return Err(Error::StubBuildFailed(status));
        }

        // Always a debug build, nothing in it is worth optimizing.
        cargo::rustc_link_search(&config.out_dir.join(&config.target).join("debug"));
        cargo::rustc_link_lib(&self.name);
        Ok(())
    }
}

fn is_c_identifier(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}
