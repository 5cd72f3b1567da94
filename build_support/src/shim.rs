use std::path::Path;

use crate::{write_if_changed, PointerWidth, Result};

/// File name of the generated type shim header.
pub const SHIM_HEADER: &str = "binder_ndk_types.h";

/// Guard for `size_t` and `ssize_t`. Defined by the shim itself.
pub const SIZE_GUARD: &str = "_SIZE_T_DEFINED";

/// Guard for the fixed width integer types. Defined by `<stdint.h>`.
pub const STDINT_GUARD: &str = "_STDINT_H";

const INCLUDE_GUARD: &str = "BINDER_NDK_TYPES_SHIM_H";

/// Fallback typedef emitted by the shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimTypedef {
    pub name: &'static str,
    pub c_type: &'static str,
    pub guard: &'static str,
}

impl ShimTypedef {
    pub fn declaration(&self) -> String {
        format!("typedef {} {};", self.c_type, self.name)
    }
}

/// Fallback definitions for the primitive types the Binder headers use
/// without including their prerequisites.
///
/// Widths follow the target pointer width reported by cargo. Android is
/// LP64 on 64-bit targets and ILP32 on 32-bit ones.
#[derive(Debug, Clone, Copy)]
pub struct TypeShim {
    width: PointerWidth,
}

impl TypeShim {
    pub fn new(width: PointerWidth) -> Self {
        Self { width }
    }

    pub fn definitions(&self) -> Vec<ShimTypedef> {
        let (size, ssize) = match self.width {
            PointerWidth::Bits64 => ("unsigned long", "long"),
            PointerWidth::Bits32 => ("unsigned int", "int"),
        };
        vec![
            ShimTypedef {
                name: "size_t",
                c_type: size,
                guard: SIZE_GUARD,
            },
            ShimTypedef {
                name: "ssize_t",
                c_type: ssize,
                guard: SIZE_GUARD,
            },
            ShimTypedef {
                name: "uint32_t",
                c_type: "unsigned int",
                guard: STDINT_GUARD,
            },
            ShimTypedef {
                name: "int32_t",
                c_type: "int",
                guard: STDINT_GUARD,
            },
        ]
    }

    pub fn render(&self) -> String {
        let definitions = self.definitions();
        let mut lines = vec![
            "/* Generated by binder_ndk_build_support. Do not edit. */".to_owned(),
            format!("#ifndef {INCLUDE_GUARD}"),
            format!("#define {INCLUDE_GUARD}"),
            String::new(),
        ];

        for guard in [SIZE_GUARD, STDINT_GUARD] {
            lines.push(format!("#ifndef {guard}"));
            if guard == SIZE_GUARD {
                lines.push(format!("#define {guard}"));
            }
            lines.extend(
                definitions
                    .iter()
                    .filter(|d| d.guard == guard)
                    .map(ShimTypedef::declaration),
            );
            lines.push("#endif".to_owned());
            lines.push(String::new());
        }

        // Fails to compile when the parser target disagrees with cargo.
        lines.push(format!(
            "typedef char binder_ndk_pointer_width_check[(sizeof(void *) == {}) ? 1 : -1];",
            self.width.bytes()
        ));
        lines.push(String::new());
        lines.push(format!("#endif /* {INCLUDE_GUARD} */"));
        lines.push(String::new());
        lines.join("\n")
    }

    /// Writes the rendered shim. An identical existing file is left alone.
    pub fn write_to(&self, path: &Path) -> Result<bool> {
        write_if_changed(path, &self.render())
    }
}
