//! Error types shared by every stage of the publish pipeline.

use std::fmt;
use std::path::PathBuf;

/// Failure to launch the external converter.
///
/// A converter that runs and exits non-zero is *not* an error; see
/// [`crate::convert::ConversionOutcome::success`].
#[derive(Debug)]
pub enum ConvertError {
    Spawn { program: String, source: std::io::Error },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Spawn { program, source } => {
                write!(f, "failed to launch converter `{program}`: {source}")
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Spawn { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub enum PublishError {
    /// Empty notebook path, or a path that is not a `.ipynb` file.
    InvalidInput(String),
    /// The notebook or the converted document is missing.
    NotFound(PathBuf),
    /// Rejected configuration value (e.g. an asset root containing a separator).
    Config(String),
    Convert(ConvertError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PublishError {
    /// Wrap an I/O error with the path it happened on, mapping `NotFound` to
    /// [`PublishError::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            PublishError::NotFound(path)
        } else {
            PublishError::Io { path, source }
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            PublishError::NotFound(path) => write!(f, "\"{}\" does not exist", path.display()),
            PublishError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            PublishError::Convert(e) => write!(f, "{e}"),
            PublishError::Io { path, source } => {
                write!(f, "I/O error on \"{}\": {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::Convert(e) => Some(e),
            PublishError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConvertError> for PublishError {
    fn from(e: ConvertError) -> Self {
        PublishError::Convert(e)
    }
}
