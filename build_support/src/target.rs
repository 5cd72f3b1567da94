use crate::{Error, Result};

/// Pointer width of the target the bindings are generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// Parses value of `CARGO_CFG_TARGET_POINTER_WIDTH`.
    pub fn from_cargo(value: &str) -> Result<Self> {
        match value.trim() {
            "32" => Ok(PointerWidth::Bits32),
            "64" => Ok(PointerWidth::Bits64),
            other => Err(Error::UnsupportedPointerWidth(other.into())),
        }
    }

    /// Pointer width of the platform this code was compiled for.
    pub fn host() -> Self {
        if cfg!(target_pointer_width = "32") {
            PointerWidth::Bits32
        } else {
            PointerWidth::Bits64
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            PointerWidth::Bits32 => 32,
            PointerWidth::Bits64 => 64,
        }
    }

    pub fn bytes(self) -> u32 {
        self.bits() / 8
    }
}

/// Android ABI derived from the rust target triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndroidAbi {
    Arm64,
    Arm,
    X86,
    X86_64,
}

impl AndroidAbi {
    pub const ALL: [AndroidAbi; 4] = [
        AndroidAbi::Arm64,
        AndroidAbi::Arm,
        AndroidAbi::X86,
        AndroidAbi::X86_64,
    ];

    /// Returns ABI for given target triple based on its architecture
    /// component, or `None` for architectures Android does not ship.
    pub fn from_target(target: &str) -> Option<Self> {
        let arch = target.split('-').next().unwrap_or_default();
        if arch == "aarch64" {
            Some(AndroidAbi::Arm64)
        } else if arch == "x86_64" {
            Some(AndroidAbi::X86_64)
        } else if arch == "i686" || arch == "i386" {
            Some(AndroidAbi::X86)
        } else if arch.starts_with("armv7") || arch.starts_with("thumbv7") || arch == "arm" {
            Some(AndroidAbi::Arm)
        } else {
            None
        }
    }

    /// Directory name under `sysroot/usr/include` with arch specific headers.
    pub fn sysroot_triple(self) -> &'static str {
        match self {
            AndroidAbi::Arm64 => "aarch64-linux-android",
            AndroidAbi::Arm => "arm-linux-androideabi",
            AndroidAbi::X86 => "i686-linux-android",
            AndroidAbi::X86_64 => "x86_64-linux-android",
        }
    }

    /// Triple used by clang and by the NDK compiler driver names.
    pub fn clang_triple(self) -> &'static str {
        match self {
            AndroidAbi::Arm => "armv7a-linux-androideabi",
            other => other.sysroot_triple(),
        }
    }

    pub fn clang_target(self, api_level: u32) -> String {
        format!("{}{}", self.clang_triple(), api_level)
    }

    pub fn pointer_width(self) -> PointerWidth {
        match self {
            AndroidAbi::Arm64 | AndroidAbi::X86_64 => PointerWidth::Bits64,
            AndroidAbi::Arm | AndroidAbi::X86 => PointerWidth::Bits32,
        }
    }
}
