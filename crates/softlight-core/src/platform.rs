//! Window-level ports: fullscreen and duplicate instances.
//!
//! Camera acquisition and fullscreen changes are requests that may be granted,
//! refused, or fail. Their resolution is reported back as an [`Outcome`] and
//! the controller updates its state only from that result.

use thiserror::Error;

use crate::media::MediaError;

/// Window-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Launching a second instance failed.
    #[error("failed to open duplicate window: {0}")]
    Spawn(#[source] std::io::Error),

    /// The host cannot perform the request.
    #[error("{0} not supported")]
    Unsupported(&'static str),
}

/// Resolved result of an asynchronous request.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Request granted.
    Granted(T),
    /// Refused by the user or the OS.
    Denied,
    /// Failed for another reason.
    Failed(String),
}

impl<T> Outcome<T> {
    /// Whether the request was granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// Granted value, if any.
    pub fn granted(self) -> Option<T> {
        match self {
            Self::Granted(v) => Some(v),
            Self::Denied | Self::Failed(_) => None,
        }
    }
}

impl<T> From<Result<T, MediaError>> for Outcome<T> {
    fn from(result: Result<T, MediaError>) -> Self {
        match result {
            Ok(v) => Self::Granted(v),
            Err(MediaError::PermissionDenied) => Self::Denied,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Whole-window fullscreen presentation.
///
/// Requests may take effect later (window managers animate the change), so
/// sending one and observing the result are separate calls.
pub trait Fullscreen {
    /// Requests entering (`true`) or leaving (`false`) fullscreen.
    fn request_fullscreen(&mut self, on: bool) -> Result<(), PlatformError>;

    /// Actual fullscreen state, `None` when the host cannot tell yet.
    fn is_fullscreen(&self) -> Option<bool>;
}

/// Opening another instance of the tool.
pub trait WindowOpener {
    /// Opens a duplicate window sharing the same stored state.
    fn open_duplicate(&self) -> Result<(), PlatformError>;
}
