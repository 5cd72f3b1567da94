use std::{
    fmt::Display,
    path::{Path, PathBuf},
    process::ExitStatus,
};

#[derive(Debug)]
pub enum Error {
    /// Environment variable required by the build script is not set.
    MissingEnv(String),
    /// Environment variable is set but its value can not be used.
    InvalidEnv { name: String, value: String },
    /// Target pointer width other than 32 or 64 bits.
    UnsupportedPointerWidth(String),
    /// Line in the symbols file is not a valid C identifier.
    InvalidSymbol { line: usize, symbol: String },
    /// Extra clang arguments could not be split into words.
    ClangArgs {
        variable: String,
        source: shell_words::ParseError,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Stub library build exited with an error.
    StubBuildFailed(ExitStatus),
    Bindgen(bindgen::BindgenError),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingEnv(name) => write!(f, "environment variable {name} is not set"),
            Error::InvalidEnv { name, value } => {
                write!(f, "invalid value '{value}' for environment variable {name}")
            }
            Error::UnsupportedPointerWidth(width) => {
                write!(f, "unsupported target pointer width: {width}")
            }
            Error::InvalidSymbol { line, symbol } => {
                write!(f, "invalid symbol '{symbol}' on line {line}")
            }
            Error::ClangArgs { variable, source } => {
                write!(f, "could not parse {variable}: {source}")
            }
            Error::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Error::StubBuildFailed(status) => write!(f, "stub library build failed with {status}"),
            Error::Bindgen(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ClangArgs { source, .. } => Some(source),
            Error::Io { source, .. } => Some(source),
            Error::Bindgen(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bindgen::BindgenError> for Error {
    fn from(err: bindgen::BindgenError) -> Self {
        Error::Bindgen(err)
    }
}

pub(crate) trait IoResultExt<T> {
    fn with_path(self, path: &Path) -> Result<T, Error>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T, Error> {
        self.map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })
    }
}
