//! Camera port: device enumeration and capture streams.
//!
//! The camera preview is optional. At startup the host asks
//! [`MediaDevices::enumerate`] once; camera controls are offered only when a
//! video input exists. Any enumeration failure counts as "no camera".
//!
//! A [`MediaStream`] is an exclusively owned resource. Every track must be
//! stopped when the preview is disabled, otherwise the device stays busy.
//! [`MediaStream::stop_all`] does that explicitly, and dropping a stream stops
//! whatever is still live.
//!
//! Video tracks publish decoded frames into a [`FrameSlot`]; the preview
//! reads the newest one through [`MediaStream::latest_frame`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, trace};

/// Camera and capture errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The user or the OS refused access.
    #[error("camera permission denied")]
    PermissionDenied,

    /// No device matches the request.
    #[error("no matching camera found")]
    NotFound,

    /// Capture is not available on this platform.
    #[error("camera capture not supported")]
    Unsupported,

    /// Device-level failure.
    #[error("camera error: {0}")]
    Device(String),
}

/// Kind of media device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Camera.
    VideoInput,
    /// Microphone.
    AudioInput,
    /// Speaker.
    AudioOutput,
}

/// One enumerated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Stable identifier.
    pub id: String,
    /// Human readable name.
    pub label: String,
    /// Device kind.
    pub kind: DeviceKind,
}

impl DeviceInfo {
    /// Camera with the given id and label.
    pub fn video_input(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: DeviceKind::VideoInput,
        }
    }
}

/// Preferred camera direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Front camera, facing the user.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

/// Capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Capture audio.
    pub audio: bool,
    /// Capture video, with a facing preference.
    pub video: Option<FacingMode>,
}

impl CaptureConstraints {
    /// Video only, user-facing. The only request the preview makes.
    pub const fn preview() -> Self {
        Self {
            audio: false,
            video: Some(FacingMode::User),
        }
    }
}

// ============================================================================
// Frames
// ============================================================================

/// One decoded RGBA8 video frame.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Increases by one per published frame.
    pub sequence: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA rows, `width * height * 4` bytes.
    pub pixels: Arc<[u8]>,
}

impl fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFrame")
            .field("sequence", &self.sequence)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Latest-frame mailbox shared between a capture thread and the preview.
///
/// Older frames are overwritten; the reader only ever sees the newest.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    inner: Arc<Mutex<Option<VideoFrame>>>,
}

impl FrameSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a frame. Returns `false` (and keeps the previous frame) when
    /// `pixels` does not hold exactly `width * height` RGBA pixels.
    pub fn publish(&self, width: u32, height: u32, pixels: Vec<u8>) -> bool {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected || expected == 0 {
            debug!(width, height, bytes = pixels.len(), "Frame size mismatch, dropped");
            return false;
        }
        let mut slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let sequence = slot.as_ref().map_or(0, |f| f.sequence + 1);
        *slot = Some(VideoFrame {
            sequence,
            width,
            height,
            pixels: pixels.into(),
        });
        true
    }

    /// Newest frame, if any arrived.
    pub fn latest(&self) -> Option<VideoFrame> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ============================================================================
// Tracks and streams
// ============================================================================

/// A single track of a capture stream.
pub trait MediaTrack: Send + fmt::Debug {
    /// Track name, usually the device label.
    fn label(&self) -> &str;

    /// Releases the underlying device. Idempotent.
    fn stop(&mut self);

    /// Whether the track still holds the device.
    fn is_live(&self) -> bool;

    /// Newest decoded frame. Audio tracks and stopped tracks have none.
    fn latest_frame(&self) -> Option<VideoFrame> {
        None
    }
}

/// Owned capture stream.
#[derive(Debug)]
pub struct MediaStream {
    id: String,
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl MediaStream {
    /// Stream made of `tracks`.
    pub fn new(id: impl Into<String>, tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    /// Stream identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All tracks, live or stopped.
    pub fn tracks(&self) -> &[Box<dyn MediaTrack>] {
        &self.tracks
    }

    /// Number of tracks still holding a device.
    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    /// Whether any track is live.
    pub fn is_active(&self) -> bool {
        self.live_tracks() > 0
    }

    /// Newest frame of the first live track that has one.
    pub fn latest_frame(&self) -> Option<VideoFrame> {
        self.tracks
            .iter()
            .filter(|t| t.is_live())
            .find_map(|t| t.latest_frame())
    }

    /// Stops every track.
    pub fn stop_all(&mut self) {
        trace!(stream = %self.id, tracks = self.tracks.len(), "MediaStream::stop_all");
        for track in &mut self.tracks {
            track.stop();
        }
    }
}

impl Drop for MediaStream {
    fn drop(&mut self) {
        if self.is_active() {
            debug!(stream = %self.id, "Stopping live tracks on drop");
            self.stop_all();
        }
    }
}

/// Media device access.
pub trait MediaDevices {
    /// Lists available devices.
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, MediaError>;

    /// Opens a capture stream matching `constraints`.
    fn open(&self, constraints: &CaptureConstraints) -> Result<MediaStream, MediaError>;
}

impl<M: MediaDevices + ?Sized> MediaDevices for &M {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, MediaError> {
        (**self).enumerate()
    }

    fn open(&self, constraints: &CaptureConstraints) -> Result<MediaStream, MediaError> {
        (**self).open(constraints)
    }
}

/// Whether at least one camera is present. Enumeration errors mean no.
pub fn has_video_input<M: MediaDevices + ?Sized>(devices: &M) -> bool {
    match devices.enumerate() {
        Ok(list) => list.iter().any(|d| d.kind == DeviceKind::VideoInput),
        Err(e) => {
            debug!(error = %e, "Device enumeration failed, treating as no camera");
            false
        }
    }
}

/// Platform without cameras.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMediaDevices;

impl MediaDevices for NoMediaDevices {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, MediaError> {
        Ok(Vec::new())
    }

    fn open(&self, _constraints: &CaptureConstraints) -> Result<MediaStream, MediaError> {
        Err(MediaError::Unsupported)
    }
}
