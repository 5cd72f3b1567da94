use std::{fs, path::Path};

use bindgen::EnumVariation;

use crate::{clang::ClangInvocation, error::IoResultExt, Result};

/// Types exported by the NDK Binder API.
pub const ALLOWED_TYPES: [&str; 8] = [
    "android::c_interface::.*",
    "AStatus",
    "AIBinder_Class",
    "AIBinder",
    "AIBinder_Weak",
    "AIBinder_DeathRecipient",
    "AParcel",
    "binder_status_t",
];

pub fn builder(invocation: &ClangInvocation) -> bindgen::Builder {
    let builder = bindgen::Builder::default()
        .header(invocation.header().to_string_lossy())
        .clang_args(invocation.args())
        .default_enum_style(EnumVariation::Rust {
            non_exhaustive: true,
        })
        .constified_enum("android::c_interface::consts::.*")
        .allowlist_function(".*")
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()));
    ALLOWED_TYPES
        .iter()
        .fold(builder, |builder, ty| builder.allowlist_type(ty))
}

/// Runs bindgen and writes the result to `out`.
pub fn generate(invocation: &ClangInvocation, out: &Path) -> Result<()> {
    let bindings = builder(invocation).generate()?;
    bindings.write_to_file(out).with_path(out)
}

/// Bindings file used when the vendor header is not available.
pub fn write_placeholder(out: &Path) -> Result<()> {
    fs::write(
        out,
        "// Binder headers were not available when this crate was built.\n",
    )
    .with_path(out)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{builder, write_placeholder, ALLOWED_TYPES};
    use crate::{BuildConfig, ClangInvocation};

    fn flag_values<'a>(flags: &'a [String], flag: &str) -> Vec<&'a str> {
        flags
            .windows(2)
            .filter(|pair| pair[0] == flag)
            .map(|pair| pair[1].as_str())
            .collect()
    }

    #[test]
    fn test_allowed_types() {
        assert_eq!(
            ALLOWED_TYPES,
            [
                "android::c_interface::.*",
                "AStatus",
                "AIBinder_Class",
                "AIBinder",
                "AIBinder_Weak",
                "AIBinder_DeathRecipient",
                "AParcel",
                "binder_status_t",
            ]
        );
    }

    #[test]
    fn test_builder() {
        let out = tempfile::tempdir().unwrap();
        let vars: HashMap<&str, String> = [
            ("TARGET", "aarch64-linux-android".to_owned()),
            ("OUT_DIR", out.path().display().to_string()),
            ("CARGO_MANIFEST_DIR", out.path().display().to_string()),
        ]
        .into_iter()
        .collect();
        let config = BuildConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();
        let invocation = ClangInvocation::new(&config, None);

        let flags = builder(&invocation).command_line_flags();
        assert_eq!(flags[0], invocation.header().to_string_lossy());
        assert_eq!(flag_values(&flags, "--allowlist-type"), ALLOWED_TYPES);
        assert_eq!(flag_values(&flags, "--allowlist-function"), [".*"]);
        assert_eq!(
            flag_values(&flags, "--constified-enum"),
            ["android::c_interface::consts::.*"]
        );
        assert_eq!(
            flag_values(&flags, "--default-enum-style"),
            ["rust_non_exhaustive"]
        );

        // clang arguments are passed through unchanged and in order
        let separator = flags.iter().position(|f| f == "--").unwrap();
        assert_eq!(&flags[separator + 1..], invocation.args());
    }

    #[test]
    fn test_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bindings.rs");
        write_placeholder(&out).unwrap();
        let contents = std::fs::read_to_string(&out).unwrap();
        assert!(contents.lines().all(|line| line.starts_with("//")));
    }
}
