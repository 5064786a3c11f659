//! # softlight-core
//!
//! State and lighting logic for the soft light screen tint: the window is
//! painted with a chosen color so the display acts as a soft light during
//! video calls.
//!
//! - [`Color`] - canonical color with hex / HSL / RGB conversions
//! - [`ApplicationState`] - the persisted record
//! - [`StateStore`] - load-or-default, mutate, persist
//! - [`Storage`] - durable key/value port ([`FileStorage`], [`MemoryStorage`])
//! - [`LightingController`] - gestures, lights out, camera and fullscreen
//! - [`MediaDevices`], [`Fullscreen`], [`WindowOpener`] - host capabilities
//!
//! ## Crate Structure
//!
//! ```text
//! softlight-core (this crate, no GUI)
//!    ^
//!    +-- softlight-view (eframe window, implements the ports)
//!           ^
//!           +-- softlight-cli (`softlight` binary)
//! ```
//!
//! ## Example
//!
//! ```
//! use softlight_core::prelude::*;
//!
//! let store = StateStore::load(MemoryStorage::new());
//! let mut lights = LightingController::new(store, ControllerConfig::default());
//! assert_eq!(lights.render_color(), "#00000000");
//!
//! lights.dispatch(Intent::ToggleEdit);
//! lights.dispatch(Intent::PickColor(Color::rgb(255, 0, 0)));
//! assert_eq!(lights.render_color(), "#ff0000ff");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod controller;
pub mod error;
pub mod media;
pub mod messages;
pub mod notification;
pub mod platform;
pub mod state;
pub mod storage;
pub mod store;

pub use color::{Color, ColorRecord, Hsl, Rgb};
pub use controller::{CameraState, ControllerConfig, Effect, Intent, LightingController, Ports};
pub use error::{ColorError, Error, Result, StorageError};
pub use media::{
    CaptureConstraints, DeviceInfo, DeviceKind, FacingMode, FrameSlot, MediaDevices, MediaError,
    MediaStream, MediaTrack, NoMediaDevices, VideoFrame, has_video_input,
};
pub use messages::{MESSAGES, MessageSource, RandomMessages, SequenceMessages};
pub use notification::{CloseReason, DEFAULT_NOTIFICATION_TIMEOUT, NotificationClock};
pub use platform::{Fullscreen, Outcome, PlatformError, WindowOpener};
pub use state::{ApplicationState, Notification};
pub use storage::{FileStorage, MemoryStorage, STORAGE_KEY, Storage};
pub use store::StateStore;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::controller::{ControllerConfig, Effect, Intent, LightingController};
    pub use crate::notification::CloseReason;
    pub use crate::platform::Outcome;
    pub use crate::state::ApplicationState;
    pub use crate::storage::{FileStorage, MemoryStorage, Storage};
    pub use crate::store::StateStore;
}
