use std::path::{Path, PathBuf};

use ::log::info;

use crate::{ndk::Ndk, wrapper::WRAPPER_HEADER, BuildConfig, Error, Result};

/// Names of the variables holding extra clang arguments for given target,
/// in the order they are applied. Same convention as bindgen itself.
pub fn extra_clang_args_vars(target: &str) -> [String; 3] {
    [
        "BINDGEN_EXTRA_CLANG_ARGS".to_owned(),
        format!("BINDGEN_EXTRA_CLANG_ARGS_{}", target.replace('-', "_")),
        format!("BINDGEN_EXTRA_CLANG_ARGS_{target}"),
    ]
}

pub fn extra_clang_args<F>(lookup: &F, target: &str) -> Result<Vec<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut args = Vec::new();
    for variable in extra_clang_args_vars(target) {
        if let Some(value) = lookup(&variable) {
            let words =
                shell_words::split(&value).map_err(|source| Error::ClangArgs { variable, source })?;
            args.extend(words);
        }
    }
    Ok(args)
}

/// Converts path to a form clang accepts. On Windows hosts drive paths
/// become `/C/...` and separators are turned into forward slashes.
pub fn normalize_path(path: &Path, windows_host: bool) -> String {
    let path = path.to_string_lossy();
    if !windows_host {
        return path.into_owned();
    }
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() && path.len() > 2 => {
            format!(
                "/{}{}",
                drive.to_ascii_uppercase(),
                path[2..].replace('\\', "/")
            )
        }
        _ => path.replace('\\', "/"),
    }
}

/// Clang arguments and header for one bindgen run. Assembled without
/// touching libclang.
#[derive(Debug, Clone)]
pub struct ClangInvocation {
    args: Vec<String>,
    header: PathBuf,
}

impl ClangInvocation {
    pub fn new(config: &BuildConfig, ndk: Option<&Ndk>) -> Self {
        let windows = config.host.is_windows();
        let abi = config.parse_abi();
        let mut args: Vec<String> = vec!["-x".into(), "c++".into(), "-std=c++17".into()];

        for dir in config.crate_include_dirs() {
            args.push(format!("-I{}", normalize_path(&dir, windows)));
        }

        args.push(format!("--target={}", abi.clang_target(config.api_level)));
        args.push(format!("-D__ANDROID_API__={}", config.api_level));
        args.push("-D__ANDROID__".into());

        if let Some(ndk) = ndk {
            if let Some(sysroot) = ndk.sysroot().filter(|s| s.is_dir()) {
                args.push(format!("--sysroot={}", normalize_path(&sysroot, windows)));
            }
            // Clang builtin headers must win over the sysroot ones.
            let (builtin, other): (Vec<_>, Vec<_>) = ndk
                .include_paths(abi)
                .into_iter()
                .partition(|p| Some(p.as_path()) == ndk.clang_include_dir());
            for path in builtin.iter().chain(other.iter()) {
                let path = normalize_path(path, windows);
                info!("Adding include path: {path}");
                args.push(format!("-I{path}"));
            }
        }

        args.extend(config.extra_clang_args.iter().cloned());

        args.extend(
            [
                "-D_GNU_SOURCE",
                "-D__STDC_LIMIT_MACROS",
                "-D__STDC_CONSTANT_MACROS",
                "-D__STDC_FORMAT_MACROS",
                "-fno-addrsig",
            ]
            .map(String::from),
        );
        args.push(format!(
            "-I{}",
            normalize_path(&config.include_dir(), windows)
        ));

        Self {
            args,
            header: config.include_dir().join(WRAPPER_HEADER),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn header(&self) -> &Path {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, fs, path::Path};

    use super::{extra_clang_args, normalize_path, ClangInvocation};
    use crate::{
        ndk::{HostTag, Ndk},
        BuildConfig, Error, PointerWidth,
    };

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_extra_args() {
        let vars = lookup(&[
            ("BINDGEN_EXTRA_CLANG_ARGS", "-DFOO=1 \"-I/path with space\""),
            ("BINDGEN_EXTRA_CLANG_ARGS_aarch64_linux_android", "-DBAR"),
            ("BINDGEN_EXTRA_CLANG_ARGS_aarch64-linux-android", "-DBAZ"),
            ("BINDGEN_EXTRA_CLANG_ARGS_x86_64_linux_android", "-DIGNORED"),
        ]);
        let args = extra_clang_args(&vars, "aarch64-linux-android").unwrap();
        assert_eq!(
            args,
            vec!["-DFOO=1", "-I/path with space", "-DBAR", "-DBAZ"]
        );
    }

    #[test]
    fn test_malformed_extra_args() {
        let vars = lookup(&[("BINDGEN_EXTRA_CLANG_ARGS", "\"-DUNTERMINATED")]);
        let err = extra_clang_args(&vars, "aarch64-linux-android").unwrap_err();
        assert!(matches!(err, Error::ClangArgs { variable, .. } if variable == "BINDGEN_EXTRA_CLANG_ARGS"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new(r"C:\Android\ndk\sysroot"), true),
            "/C/Android/ndk/sysroot"
        );
        assert_eq!(normalize_path(Path::new("d:/ndk"), true), "/D/ndk");
        assert_eq!(normalize_path(Path::new(r"src\include"), true), "src/include");
        assert_eq!(
            normalize_path(Path::new("/opt/android/ndk"), false),
            "/opt/android/ndk"
        );
    }

    fn config_for(out_dir: &Path, manifest_dir: &Path, ndk_root: Option<&Path>) -> BuildConfig {
        let mut vars = vec![
            ("TARGET".to_owned(), "aarch64-linux-android".to_owned()),
            ("OUT_DIR".to_owned(), out_dir.display().to_string()),
            (
                "CARGO_MANIFEST_DIR".to_owned(),
                manifest_dir.display().to_string(),
            ),
            ("BINDER_NDK_API_LEVEL".to_owned(), "31".to_owned()),
            ("BINDGEN_EXTRA_CLANG_ARGS".to_owned(), "-DEXTRA".to_owned()),
        ];
        if let Some(root) = ndk_root {
            vars.push(("ANDROID_NDK_HOME".to_owned(), root.display().to_string()));
        }
        let vars: HashMap<_, _> = vars.into_iter().collect();
        let mut config = BuildConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();
        config.host = HostTag::Linux;
        config
    }

    #[test]
    fn test_invocation_without_ndk() {
        let out = tempfile::tempdir().unwrap();
        let manifest = tempfile::tempdir().unwrap();
        fs::create_dir_all(manifest.path().join("src/include_ndk")).unwrap();
        let config = config_for(out.path(), manifest.path(), None);

        let invocation = ClangInvocation::new(&config, None);
        let args = invocation.args();
        assert_eq!(&args[..3], &["-x", "c++", "-std=c++17"]);
        assert_eq!(
            args[3],
            format!("-I{}", manifest.path().join("src/include_ndk").display())
        );
        assert!(args.contains(&"--target=aarch64-linux-android31".to_owned()));
        assert!(args.contains(&"-D__ANDROID_API__=31".to_owned()));
        assert!(!args.iter().any(|a| a.starts_with("--sysroot")));
        let extra = args.iter().position(|a| a == "-DEXTRA").unwrap();
        let gnu = args.iter().position(|a| a == "-D_GNU_SOURCE").unwrap();
        assert!(extra < gnu);
        assert_eq!(
            args.last().unwrap(),
            &format!("-I{}", out.path().join("include").display())
        );
        assert!(invocation.header().ends_with("include/wrapper.h"));
    }

    #[test]
    fn test_invocation_for_32_bit_host_target() {
        let out = tempfile::tempdir().unwrap();
        let manifest = tempfile::tempdir().unwrap();
        let mut config = config_for(out.path(), manifest.path(), None);
        config.target = "armv5te-unknown-linux-gnueabi".to_owned();
        config.target_os = "linux".to_owned();
        config.pointer_width = PointerWidth::Bits32;

        let invocation = ClangInvocation::new(&config, None);
        let args = invocation.args();
        assert!(args.contains(&"--target=armv7a-linux-androideabi31".to_owned()));
        assert!(!args.iter().any(|a| a.contains("aarch64")));
    }

    #[test]
    fn test_invocation_with_ndk() {
        let out = tempfile::tempdir().unwrap();
        let manifest = tempfile::tempdir().unwrap();
        let ndk_dir = tempfile::tempdir().unwrap();
        let prebuilt = ndk_dir.path().join("toolchains/llvm/prebuilt/linux-x86_64");
        fs::create_dir_all(prebuilt.join("sysroot/usr/include/aarch64-linux-android")).unwrap();
        fs::create_dir_all(prebuilt.join("lib/clang/18/include")).unwrap();

        let config = config_for(out.path(), manifest.path(), Some(ndk_dir.path()));
        let ndk = Ndk::at(ndk_dir.path(), HostTag::Linux).unwrap();
        let invocation = ClangInvocation::new(&config, Some(&ndk));
        let args = invocation.args();

        let sysroot = format!("--sysroot={}", prebuilt.join("sysroot").display());
        let builtin = format!("-I{}", prebuilt.join("lib/clang/18/include").display());
        let usr = format!("-I{}", prebuilt.join("sysroot/usr/include").display());
        let sysroot_pos = args.iter().position(|a| *a == sysroot).unwrap();
        let builtin_pos = args.iter().position(|a| *a == builtin).unwrap();
        let usr_pos = args.iter().position(|a| *a == usr).unwrap();
        assert!(sysroot_pos < builtin_pos);
        assert!(builtin_pos < usr_pos);
    }
}
