//! Message types for UI <-> worker communication.
//!
//! The UI thread sends requests that may block (device enumeration, camera
//! open, process spawn); the worker answers with events drained once per
//! frame.

use softlight_core::{CaptureConstraints, MediaStream, Outcome};

/// Messages from the UI thread to the worker thread.
#[derive(Debug, Clone)]
pub enum HostMsg {
    /// Check whether a camera exists.
    ProbeCamera,

    /// Open a capture stream.
    AcquireCamera(CaptureConstraints),

    /// Launch another window.
    OpenDuplicate,

    /// Stop the worker.
    Close,
}

/// Events from the worker thread to the UI thread.
#[derive(Debug)]
pub enum HostEvent {
    /// Camera probe result.
    CameraProbed(bool),

    /// Capture request resolved.
    CameraResolved(Outcome<MediaStream>),

    /// Duplicate window could not be launched.
    DuplicateFailed(String),
}
