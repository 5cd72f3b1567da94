use std::{
    fs,
    path::{Path, PathBuf},
};

use ::log::{debug, info, warn};
use once_cell::unsync::OnceCell;

use crate::AndroidAbi;

/// Environment variables that may point to the NDK, in order of preference.
pub const NDK_ENV_VARS: [&str; 3] = ["ANDROID_NDK_HOME", "NDK_ROOT", "ANDROID_NDK_ROOT"];

/// Install locations checked when no environment variable is set.
pub const WELL_KNOWN_ROOTS: [&str; 4] = [
    "C:/Android/android-ndk-r28b",
    "D:/android-ndk-r28b",
    "C:/android-ndk-r28b",
    "D:/Android/android-ndk-r28b",
];

/// Name of the prebuilt toolchain directory for the build host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostTag {
    Windows,
    Linux,
    Darwin,
}

impl HostTag {
    /// Build scripts run on the host, so this is the host platform.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostTag::Windows
        } else if cfg!(target_os = "macos") {
            HostTag::Darwin
        } else {
            HostTag::Linux
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HostTag::Windows => "windows-x86_64",
            HostTag::Linux => "linux-x86_64",
            HostTag::Darwin => "darwin-x86_64",
        }
    }

    pub fn is_windows(self) -> bool {
        self == HostTag::Windows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NdkLayout {
    /// r19+ layout with the sysroot inside the prebuilt toolchain.
    Unified,
    /// Sysroot at the NDK root.
    Legacy,
}

/// Android NDK installation.
#[derive(Debug)]
pub struct Ndk {
    root: PathBuf,
    host: HostTag,
    layout: NdkLayout,
    clang_include: OnceCell<Option<PathBuf>>,
}

impl Ndk {
    /// Returns NDK rooted at `root` if the directory has a recognizable
    /// layout for given host.
    pub fn at(root: impl Into<PathBuf>, host: HostTag) -> Option<Self> {
        let root = root.into();
        let prebuilt = root.join("toolchains/llvm/prebuilt");
        if !prebuilt.is_dir() {
            return None;
        }
        let layout = if prebuilt.join(host.as_str()).join("sysroot").is_dir() {
            NdkLayout::Unified
        } else if root.join("sysroot").is_dir() {
            NdkLayout::Legacy
        } else {
            return None;
        };
        Some(Self {
            root,
            host,
            layout,
            clang_include: OnceCell::new(),
        })
    }

    /// Returns first valid NDK among candidates.
    pub fn detect<I>(candidates: I, host: HostTag) -> Option<Self>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for candidate in candidates {
            match Ndk::at(&candidate, host) {
                Some(ndk) => {
                    info!("Found Android NDK at: {}", candidate.display());
                    return Some(ndk);
                }
                None => debug!("Not an Android NDK: {}", candidate.display()),
            }
        }
        None
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> NdkLayout {
        self.layout
    }

    pub fn prebuilt_dir(&self) -> PathBuf {
        self.root
            .join("toolchains/llvm/prebuilt")
            .join(self.host.as_str())
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.prebuilt_dir().join("bin")
    }

    /// Sysroot to pass to clang. Only the unified layout has one that clang
    /// understands.
    pub fn sysroot(&self) -> Option<PathBuf> {
        match self.layout {
            NdkLayout::Unified => Some(self.prebuilt_dir().join("sysroot")),
            NdkLayout::Legacy => None,
        }
    }

    fn sysroot_include(&self) -> PathBuf {
        match self.layout {
            NdkLayout::Unified => self.prebuilt_dir().join("sysroot/usr/include"),
            NdkLayout::Legacy => self.root.join("sysroot/usr/include"),
        }
    }

    /// Clang builtin headers (`stddef.h`, `stdbool.h`, ...) of the newest
    /// clang shipped with the NDK.
    pub fn clang_include_dir(&self) -> Option<&Path> {
        self.clang_include
            .get_or_init(|| {
                let clang_dir = self.prebuilt_dir().join("lib/clang");
                let entries = fs::read_dir(&clang_dir).ok()?;
                entries
                    .flatten()
                    .filter(|e| e.file_type().map_or(false, |t| t.is_dir()))
                    .filter(|e| e.path().join("include").is_dir())
                    .max_by_key(|e| version_key(&e.file_name().to_string_lossy()))
                    .map(|e| e.path().join("include"))
            })
            .as_deref()
    }

    /// Existing include directories for given ABI. Clang builtin headers
    /// come first.
    pub fn include_paths(&self, abi: AndroidAbi) -> Vec<PathBuf> {
        let sysroot_include = self.sysroot_include();
        let candidates = [
            self.clang_include_dir().map(Path::to_owned),
            Some(sysroot_include.clone()),
            Some(sysroot_include.join(abi.sysroot_triple())),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|p| {
                let exists = p.is_dir();
                if exists {
                    info!("Found include path: {}", p.display());
                } else {
                    warn!("Path does not exist: {}", p.display());
                }
                exists
            })
            .collect()
    }
}

/// NDKs bundled with the SDK: the legacy `ndk-bundle` and the newest
/// side-by-side `ndk/<version>`.
pub fn sdk_candidates(sdk_root: &Path) -> Vec<PathBuf> {
    let mut res = vec![sdk_root.join("ndk-bundle")];
    if let Ok(entries) = fs::read_dir(sdk_root.join("ndk")) {
        let newest = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .max_by_key(|e| version_key(&e.file_name().to_string_lossy()));
        if let Some(newest) = newest {
            res.push(newest.path());
        }
    }
    res
}

/// Numeric components of a dotted version, for ordering directory names
/// such as `17.0.2` or `26.1.10909125`.
pub(crate) fn version_key(name: &str) -> Vec<u64> {
    name.split('.')
        .map(|part| {
            part.chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .unwrap_or(0)
        })
        .collect()
}
