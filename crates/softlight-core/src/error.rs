//! Error types for softlight-core operations.
//!
//! Each concern carries its own error enum ([`StorageError`], [`ColorError`],
//! [`MediaError`](crate::media::MediaError),
//! [`PlatformError`](crate::platform::PlatformError)). The crate-level
//! [`Error`] wraps all of them so callers that do not care about the source
//! can use a single [`Result`].
//!
//! Nothing in the lighting controller is fatal: these errors are logged and
//! degraded to "feature unavailable". They surface only at the edges, e.g.
//! when the CLI writes the persisted record explicitly.
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive `Error` and `Display`

use std::path::PathBuf;

use thiserror::Error;

use crate::media::MediaError;
use crate::platform::PlatformError;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Durable storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Color parsing failed.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Camera enumeration or capture failed.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Window-level request failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The persisted record could not be encoded or decoded.
    #[error("invalid state record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters that cannot name a record.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// No storage directory could be resolved for this platform.
    #[error("no configuration directory available")]
    NoDirectory,

    /// Filesystem failure while reading or writing a record.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Creates a [`StorageError::Io`] for `path`.
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Color parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    /// Hex string has the wrong length or non-hex digits.
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    /// Record carries neither an `rgb` nor a `hex` form.
    #[error("color record has no usable representation")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = StorageError::io(
            "/tmp/soft-light-data.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("soft-light-data.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn storage_error_converts() {
        let err: Error = StorageError::InvalidKey("../x".into()).into();
        assert!(matches!(err, Error::Storage(StorageError::InvalidKey(_))));
        assert!(err.to_string().contains("../x"));
    }

    #[test]
    fn color_error_display() {
        assert_eq!(
            ColorError::InvalidHex("#zz".into()).to_string(),
            "invalid hex color: \"#zz\""
        );
    }
}
