use std::path::{Path, PathBuf};

use crate::{shim::SHIM_HEADER, write_if_changed, Result};

/// File name of the generated wrapper header.
pub const WRAPPER_HEADER: &str = "wrapper.h";

/// Standard headers the Binder headers expect to be already included.
pub const DEFAULT_PRELUDE: [&str; 4] = ["stddef.h", "stdbool.h", "stdint.h", "sys/types.h"];

const INCLUDE_GUARD: &str = "BINDER_NDK_WRAPPER_H";

/// Header that includes standard headers, then the type shim, then the
/// vendor header.
#[derive(Debug, Clone)]
pub struct InclusionWrapper {
    prelude: Vec<String>,
    shim: String,
    vendor: PathBuf,
}

impl InclusionWrapper {
    pub fn new(vendor: impl Into<PathBuf>) -> Self {
        Self {
            prelude: DEFAULT_PRELUDE.iter().map(|h| (*h).to_owned()).collect(),
            shim: SHIM_HEADER.to_owned(),
            vendor: vendor.into(),
        }
    }

    pub fn with_prelude<I, S>(mut self, prelude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prelude = prelude.into_iter().map(Into::into).collect();
        self
    }

    pub fn prelude(&self) -> &[String] {
        &self.prelude
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            "/* Generated by binder_ndk_build_support. Do not edit. */".to_owned(),
            format!("#ifndef {INCLUDE_GUARD}"),
            format!("#define {INCLUDE_GUARD}"),
            String::new(),
        ];

        // Missing standard headers are skipped, the shim fills the gap.
        lines.push("#ifdef __has_include".to_owned());
        for header in &self.prelude {
            lines.push(format!("#if __has_include(<{header}>)"));
            lines.push(format!("#include <{header}>"));
            lines.push("#endif".to_owned());
        }
        lines.push("#else".to_owned());
        for header in &self.prelude {
            lines.push(format!("#include <{header}>"));
        }
        lines.push("#endif".to_owned());
        lines.push(String::new());

        lines.push(format!("#include \"{}\"", self.shim));
        lines.push(format!("#include \"{}\"", include_path(&self.vendor)));
        lines.push(String::new());
        lines.push(format!("#endif /* {INCLUDE_GUARD} */"));
        lines.push(String::new());
        lines.join("\n")
    }

    pub fn write_to(&self, path: &Path) -> Result<bool> {
        write_if_changed(path, &self.render())
    }
}

// Preprocessors accept forward slashes everywhere; backslashes would be
// read as escapes.
fn include_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::InclusionWrapper;

    fn include_lines(rendered: &str) -> Vec<&str> {
        rendered
            .lines()
            .filter(|l| l.starts_with("#include"))
            .collect()
    }

    #[test]
    fn test_order() {
        let wrapper = InclusionWrapper::new("BinderBindings.hpp").render();
        let lines = include_lines(&wrapper);
        let vendor = lines
            .iter()
            .position(|l| *l == "#include \"BinderBindings.hpp\"")
            .unwrap();
        let shim = lines
            .iter()
            .position(|l| *l == "#include \"binder_ndk_types.h\"")
            .unwrap();
        assert_eq!(vendor, lines.len() - 1);
        assert_eq!(shim, lines.len() - 2);
        for header in ["stddef.h", "stdbool.h", "stdint.h", "sys/types.h"] {
            let pos = lines
                .iter()
                .position(|l| *l == format!("#include <{header}>"))
                .unwrap();
            assert!(pos < shim);
        }
    }

    #[test]
    fn test_prelude_order_is_kept() {
        let wrapper = InclusionWrapper::new("v.h").render();
        let lines = include_lines(&wrapper);
        assert_eq!(
            &lines[..4],
            &[
                "#include <stddef.h>",
                "#include <stdbool.h>",
                "#include <stdint.h>",
                "#include <sys/types.h>",
            ]
        );
    }

    #[test]
    fn test_custom_prelude() {
        let wrapper = InclusionWrapper::new("v.h").with_prelude(["stdint.h"]);
        assert_eq!(wrapper.prelude(), &["stdint.h".to_owned()]);
        let rendered = wrapper.render();
        assert!(!rendered.contains("stddef.h"));
        assert!(rendered.contains("#if __has_include(<stdint.h>)"));
    }

    #[test]
    fn test_include_guard() {
        let rendered = InclusionWrapper::new("v.h").render();
        assert!(rendered.contains("#ifndef BINDER_NDK_WRAPPER_H\n#define BINDER_NDK_WRAPPER_H"));
        assert!(rendered.trim_end().ends_with("#endif /* BINDER_NDK_WRAPPER_H */"));
    }

    #[test]
    fn test_windows_vendor_path() {
        let rendered = InclusionWrapper::new(r"C:\ndk\src\BinderBindings.hpp").render();
        assert!(rendered.contains("#include \"C:/ndk/src/BinderBindings.hpp\""));
    }
}
