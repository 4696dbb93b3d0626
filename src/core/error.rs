use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading an installer's spec files.
#[derive(Debug, Error)]
pub enum IzError {
    /// A required spec or resource file does not exist.
    #[error("spec not found at: {}", path.display())]
    MissingFile { path: PathBuf },

    /// The file exists but is not well-formed XML.
    #[error("malformed XML in {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    /// The verifier was started with an unusable combination of arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IzError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            IzError::MissingFile { path }
        } else {
            IzError::Io { path, source }
        }
    }
}
