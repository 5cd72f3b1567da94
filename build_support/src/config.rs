use std::path::PathBuf;

use ::log::{warn, LevelFilter};

use crate::{
    clang::extra_clang_args,
    ndk::{sdk_candidates, HostTag, NDK_ENV_VARS, WELL_KNOWN_ROOTS},
    AndroidAbi, Error, PointerWidth, Result,
};

pub const DEFAULT_API_LEVEL: u32 = 33;

/// Environment variables that change the build script output.
pub const TRACKED_ENV_VARS: [&str; 12] = [
    "ANDROID_NDK_HOME",
    "NDK_ROOT",
    "ANDROID_NDK_ROOT",
    "ANDROID_SDK_ROOT",
    "BINDER_NDK_API_LEVEL",
    "BINDER_NDK_HEADER",
    "BINDER_NDK_STUB",
    "BINDER_NDK_LOG",
    "BINDGEN_EXTRA_CLANG_ARGS",
    "CARGO_CFG_TARGET_POINTER_WIDTH",
    "CARGO_CFG_TARGET_OS",
    "TARGET",
];

/// Everything the build script reads from its environment.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub target: String,
    pub target_os: String,
    pub pointer_width: PointerWidth,
    pub out_dir: PathBuf,
    pub manifest_dir: PathBuf,
    pub cargo: PathBuf,
    pub host: HostTag,
    pub api_level: u32,
    pub vendor_header: PathBuf,
    pub stub: bool,
    pub log_level: LevelFilter,
    pub ndk_candidates: Vec<PathBuf>,
    pub extra_clang_args: Vec<String>,
}

impl BuildConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from arbitrary variable lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| lookup(name).ok_or_else(|| Error::MissingEnv(name.into()));

        let target = required("TARGET")?;
        let out_dir = PathBuf::from(required("OUT_DIR")?);
        let manifest_dir = PathBuf::from(required("CARGO_MANIFEST_DIR")?);
        let abi = AndroidAbi::from_target(&target);

        let target_os = lookup("CARGO_CFG_TARGET_OS").unwrap_or_else(|| {
            if target.contains("android") {
                "android".into()
            } else {
                String::new()
            }
        });

        let pointer_width = match (lookup("CARGO_CFG_TARGET_POINTER_WIDTH"), abi) {
            (Some(width), _) => PointerWidth::from_cargo(&width)?,
            (None, Some(abi)) => abi.pointer_width(),
            (None, None) => return Err(Error::MissingEnv("CARGO_CFG_TARGET_POINTER_WIDTH".into())),
        };

        let api_level = match lookup("BINDER_NDK_API_LEVEL") {
            Some(value) => parse_value("BINDER_NDK_API_LEVEL", &value)?,
            None => DEFAULT_API_LEVEL,
        };

        let stub = match lookup("BINDER_NDK_STUB").as_deref().map(str::trim) {
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            Some(other) => {
                return Err(Error::InvalidEnv {
                    name: "BINDER_NDK_STUB".into(),
                    value: other.into(),
                })
            }
            None => target_os == "android",
        };

        let log_level = match lookup("BINDER_NDK_LOG") {
            Some(value) => parse_value("BINDER_NDK_LOG", &value)?,
            None => LevelFilter::Info,
        };

        let vendor_header = lookup("BINDER_NDK_HEADER")
            .map(PathBuf::from)
            .unwrap_or_else(|| manifest_dir.join("src/BinderBindings.hpp"));

        let mut ndk_candidates: Vec<PathBuf> = NDK_ENV_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .map(PathBuf::from)
            .collect();
        ndk_candidates.extend(WELL_KNOWN_ROOTS.iter().map(PathBuf::from));
        if let Some(sdk_root) = lookup("ANDROID_SDK_ROOT") {
            ndk_candidates.extend(sdk_candidates(&PathBuf::from(sdk_root)));
        }

        let extra_clang_args = extra_clang_args(&lookup, &target)?;

        Ok(Self {
            target,
            target_os,
            pointer_width,
            out_dir,
            manifest_dir,
            cargo: lookup("CARGO")
                .map(PathBuf::from)
                .unwrap_or_else(|| "cargo".into()),
            host: HostTag::current(),
            api_level,
            vendor_header,
            stub,
            log_level,
            ndk_candidates,
            extra_clang_args,
        })
    }

    pub fn is_android(&self) -> bool {
        self.target_os == "android"
    }

    /// Android ABI of the build target, if it is one Android ships.
    pub fn abi(&self) -> Option<AndroidAbi> {
        AndroidAbi::from_target(&self.target)
    }

    /// ABI the headers are parsed for. Targets without an Android
    /// counterpart fall back to the arm ABI of the same pointer width.
    pub fn parse_abi(&self) -> AndroidAbi {
        let abi = self.abi().unwrap_or_else(|| {
            let fallback = match self.pointer_width {
                PointerWidth::Bits32 => AndroidAbi::Arm,
                PointerWidth::Bits64 => AndroidAbi::Arm64,
            };
            warn!(
                "{} has no Android counterpart, parsing headers for {}",
                self.target,
                fallback.sysroot_triple()
            );
            fallback
        });
        if abi.pointer_width() != self.pointer_width {
            warn!(
                "{} is {}-bit but target pointer width is {}-bit",
                abi.clang_triple(),
                abi.pointer_width().bits(),
                self.pointer_width.bits()
            );
        }
        abi
    }

    /// Directory for generated headers.
    pub fn include_dir(&self) -> PathBuf {
        self.out_dir.join("include")
    }

    pub fn bindings_path(&self) -> PathBuf {
        self.out_dir.join("bindings.rs")
    }

    pub fn symbols_file(&self) -> PathBuf {
        self.manifest_dir.join("src/symbols.txt")
    }

    /// Include directories shipped with the crate. Only existing ones are
    /// returned.
    pub fn crate_include_dirs(&self) -> Vec<PathBuf> {
        ["include_cpp", "include_ndk", "include_platform"]
            .iter()
            .map(|dir| self.manifest_dir.join("src").join(dir))
            .filter(|dir| dir.is_dir())
            .collect()
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidEnv {
        name: name.into(),
        value: value.into(),
    })
}
