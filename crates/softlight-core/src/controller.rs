//! Lighting controller: the state machine behind every user gesture.
//!
//! The controller owns the [`StateStore`] plus the session-only flags (picker
//! visibility, lights out, camera, fullscreen). A gesture arrives as an
//! [`Intent`]; [`LightingController::dispatch`] applies it synchronously and
//! may hand back an [`Effect`] for the host to carry out. Camera and
//! fullscreen effects resolve later; the host reports the result through
//! [`camera_resolved`](LightingController::camera_resolved),
//! [`observe_fullscreen`](LightingController::observe_fullscreen) or
//! [`fullscreen_resolved`](LightingController::fullscreen_resolved), and
//! flags flip to "on" only from a granted result.
//!
//! ```text
//! Intent -> dispatch -> StateStore::apply (persist) -> Option<Effect>
//!                                                        |
//!            camera_resolved / observe_fullscreen  <-  host
//! ```
//!
//! # Lights out
//!
//! Entering lights out remembers the current background and paints
//! [`Color::OFF`]; leaving restores the remembered color exactly.
//!
//! # Camera
//!
//! ```text
//! Unavailable --probe ok--> Off --toggle--> Requesting --granted--> Live(stream)
//!                            ^                  |  denied/failed       |
//!                            +------------------+----------------------+ toggle (stop tracks)
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::color::Color;
use crate::media::{CaptureConstraints, MediaDevices, MediaStream, has_video_input};
use crate::messages::{MESSAGES, MessageSource, RandomMessages};
use crate::notification::{CloseReason, DEFAULT_NOTIFICATION_TIMEOUT, NotificationClock};
use crate::platform::{Fullscreen, Outcome, WindowOpener};
use crate::state::{ApplicationState, Notification};
use crate::storage::Storage;
use crate::store::StateStore;

/// Controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Auto-hide delay for notifications.
    pub notification_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
        }
    }
}

/// User gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Picker produced a color (while dragging or on release).
    PickColor(Color),
    /// Store the current background as the default color.
    SaveDefault,
    /// Show or hide the picker.
    ToggleEdit,
    /// Switch to swatches (`true`) or the freeform picker (`false`).
    TogglePalette(bool),
    /// Enter or leave lights out.
    ToggleLightsOut,
    /// Start or stop the camera preview.
    ToggleCamera,
    /// Enter or leave fullscreen.
    ToggleFullscreen,
    /// Open another window.
    DuplicateWindow,
    /// Close the notification.
    DismissNotification(CloseReason),
}

/// Work the host performs on the controller's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Open a capture stream; report via `camera_resolved`.
    AcquireCamera(CaptureConstraints),
    /// Enter (`true`) or leave fullscreen; report via `observe_fullscreen`
    /// or `fullscreen_resolved`.
    SetFullscreen(bool),
    /// Launch a duplicate window.
    OpenDuplicate,
}

/// Camera preview state.
#[derive(Debug, Default)]
pub enum CameraState {
    /// No camera was found (or not probed yet). Controls stay hidden.
    #[default]
    Unavailable,
    /// Camera present, preview off.
    Off,
    /// Stream requested, no answer yet.
    Requesting,
    /// Stream attached to the preview.
    Live(MediaStream),
}

/// Host capabilities used by [`LightingController::run_effect`].
pub struct Ports<'a> {
    /// Camera access.
    pub media: &'a dyn MediaDevices,
    /// Window fullscreen.
    pub fullscreen: &'a mut dyn Fullscreen,
    /// Duplicate windows.
    pub window: &'a dyn WindowOpener,
}

/// Event-driven lighting logic on top of a [`StateStore`].
pub struct LightingController<S> {
    store: StateStore<S>,
    show_picker: bool,
    lights_out: bool,
    old_color: Color,
    camera: CameraState,
    fullscreen: bool,
    pending_fullscreen: Option<bool>,
    message_index: usize,
    messages: Box<dyn MessageSource>,
    clock: NotificationClock,
}

impl<S: fmt::Debug> fmt::Debug for LightingController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightingController")
            .field("store", &self.store)
            .field("show_picker", &self.show_picker)
            .field("lights_out", &self.lights_out)
            .field("camera", &self.camera)
            .field("fullscreen", &self.fullscreen)
            .field("message_index", &self.message_index)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> LightingController<S> {
    /// Creates a controller over a loaded store.
    pub fn new(store: StateStore<S>, config: ControllerConfig) -> Self {
        let old_color = store.state().background_color;
        let mut clock = NotificationClock::new(config.notification_timeout);
        if store.state().notification.show {
            clock.start(Instant::now());
        }

        Self {
            store,
            show_picker: false,
            lights_out: false,
            old_color,
            camera: CameraState::Unavailable,
            fullscreen: false,
            pending_fullscreen: None,
            message_index: 0,
            messages: Box::new(RandomMessages),
            clock,
        }
    }

    /// Replaces the message chooser.
    pub fn with_messages(mut self, source: impl MessageSource + 'static) -> Self {
        self.messages = Box::new(source);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Persisted state.
    pub fn state(&self) -> &ApplicationState {
        self.store.state()
    }

    /// Underlying store.
    pub fn store(&self) -> &StateStore<S> {
        &self.store
    }

    /// Consumes the controller, returning its store. A live camera stream is
    /// released.
    pub fn into_store(self) -> StateStore<S> {
        self.store
    }

    /// Background paint value, `#rrggbbaa`.
    pub fn render_color(&self) -> String {
        self.state().background_color.render_string()
    }

    /// Informational message above the picker.
    pub fn message(&self) -> &'static str {
        MESSAGES[self.message_index]
    }

    /// Index of [`message`](Self::message) in [`MESSAGES`].
    pub fn message_index(&self) -> usize {
        self.message_index
    }

    /// Active notification.
    pub fn notification(&self) -> &Notification {
        &self.state().notification
    }

    /// Whether the picker is visible.
    pub fn show_picker(&self) -> bool {
        self.show_picker
    }

    /// Whether lights out is active.
    pub fn lights_out(&self) -> bool {
        self.lights_out
    }

    /// Whether the window is fullscreen, as last confirmed.
    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Fullscreen target awaiting confirmation.
    pub fn pending_fullscreen(&self) -> Option<bool> {
        self.pending_fullscreen
    }

    /// Camera state.
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Whether camera controls should be offered.
    pub fn camera_available(&self) -> bool {
        !matches!(self.camera, CameraState::Unavailable)
    }

    /// Whether the preview has a live stream attached.
    pub fn show_video(&self) -> bool {
        matches!(self.camera, CameraState::Live(_))
    }

    /// Attached stream, if the preview is live.
    pub fn camera_stream(&self) -> Option<&MediaStream> {
        match &self.camera {
            CameraState::Live(stream) => Some(stream),
            _ => None,
        }
    }

    /// Time until the notification hides itself.
    pub fn notification_remaining(&self, now: Instant) -> Option<Duration> {
        self.clock.remaining(now)
    }

    // ------------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------------

    /// Applies a user gesture.
    pub fn dispatch(&mut self, intent: Intent) -> Option<Effect> {
        trace!(?intent, "LightingController::dispatch");
        match intent {
            Intent::PickColor(color) => self.pick_color(color),
            Intent::SaveDefault => self.save_default(),
            Intent::ToggleEdit => self.toggle_edit(),
            Intent::TogglePalette(use_palette) => self.toggle_palette(use_palette),
            Intent::ToggleLightsOut => self.toggle_lights_out(),
            Intent::ToggleCamera => return self.toggle_camera(),
            Intent::ToggleFullscreen => return self.toggle_fullscreen(),
            Intent::DuplicateWindow => return Some(Effect::OpenDuplicate),
            Intent::DismissNotification(reason) => self.dismiss(reason),
        }
        None
    }

    fn pick_color(&mut self, color: Color) {
        if !self.show_picker {
            debug!("Color pick ignored, picker hidden");
            return;
        }

        let mut cleared = false;
        self.store.apply(|s| {
            s.background_color = color;
            if s.notification.show {
                s.notification = Notification::hidden();
                cleared = true;
            }
        });
        if cleared {
            self.clock.stop();
        }
        debug!(color = %color, "Background color picked");
    }

    fn save_default(&mut self) {
        let render = self.render_color();
        self.store.apply(|s| s.default_color = s.background_color);
        self.show_picker = false;
        info!(color = %render, "Default color saved");
        self.notify(format!("Saved default soft light as {render} 😎"));
    }

    fn toggle_edit(&mut self) {
        self.show_picker = !self.show_picker;
        let mode = if self.show_picker {
            "enabled 🎨"
        } else {
            "disabled"
        };
        self.notify(format!("Edit mode {mode}"));
    }

    fn toggle_palette(&mut self, use_palette: bool) {
        self.message_index = self.messages.next_index(MESSAGES.len()).min(MESSAGES.len() - 1);
        self.store.apply(|s| s.use_palette = use_palette);
        self.show_picker = true;
        debug!(use_palette, message = self.message_index, "Picker presentation switched");
    }

    fn toggle_lights_out(&mut self) {
        self.lights_out = !self.lights_out;
        if self.lights_out {
            self.old_color = self.state().background_color;
            self.store.apply(|s| s.background_color = Color::OFF);
        } else {
            let restored = self.old_color;
            self.store.apply(|s| s.background_color = restored);
        }

        let mode = if self.lights_out { "enabled" } else { "disabled" };
        info!(lights_out = self.lights_out, "Lights out toggled");
        self.notify(format!("Lights Out {mode}"));
    }

    fn toggle_camera(&mut self) -> Option<Effect> {
        match std::mem::take(&mut self.camera) {
            CameraState::Unavailable => {
                debug!("Camera toggle ignored, no camera");
                None
            }
            CameraState::Off => {
                self.camera = CameraState::Requesting;
                debug!("Requesting camera stream");
                Some(Effect::AcquireCamera(CaptureConstraints::preview()))
            }
            CameraState::Requesting => {
                self.camera = CameraState::Off;
                debug!("Camera request abandoned");
                None
            }
            CameraState::Live(mut stream) => {
                stream.stop_all();
                self.camera = CameraState::Off;
                info!(stream = %stream.id(), "Camera preview stopped");
                self.notify("Camera disabled 👍");
                None
            }
        }
    }

    fn toggle_fullscreen(&mut self) -> Option<Effect> {
        if let Some(target) = self.pending_fullscreen {
            debug!(target, "Fullscreen request already pending");
            return None;
        }
        let target = !self.fullscreen;
        self.pending_fullscreen = Some(target);
        Some(Effect::SetFullscreen(target))
    }

    fn dismiss(&mut self, reason: CloseReason) {
        if !reason.dismisses() {
            trace!(?reason, "Dismissal ignored");
            return;
        }
        if self.notification().show {
            self.hide_notification();
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        let notification = Notification::shown(message);
        debug!(message = %notification.message, "Notification shown");
        self.store.apply(|s| s.notification = notification);
        self.clock.start(Instant::now());
    }

    fn hide_notification(&mut self) {
        self.store.apply(|s| s.notification = Notification::hidden());
        self.clock.stop();
    }

    // ------------------------------------------------------------------------
    // Host reports
    // ------------------------------------------------------------------------

    /// Hides the notification once its timeout has elapsed at `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.clock.expired(now) {
            self.dismiss(CloseReason::Timeout);
        }
    }

    /// Records the startup camera probe.
    pub fn set_camera_supported(&mut self, supported: bool) {
        debug!(supported, "Camera capability");
        if supported {
            if matches!(self.camera, CameraState::Unavailable) {
                self.camera = CameraState::Off;
            }
        } else if let CameraState::Live(mut stream) =
            std::mem::replace(&mut self.camera, CameraState::Unavailable)
        {
            stream.stop_all();
        }
    }

    /// Probes `devices` for a camera.
    pub fn probe_camera(&mut self, devices: &dyn MediaDevices) {
        self.set_camera_supported(has_video_input(devices));
    }

    /// Resolution of an [`Effect::AcquireCamera`].
    pub fn camera_resolved(&mut self, outcome: Outcome<MediaStream>) {
        match outcome {
            Outcome::Granted(mut stream) => {
                if matches!(self.camera, CameraState::Requesting) {
                    info!(stream = %stream.id(), tracks = stream.tracks().len(), "Camera preview started");
                    self.camera = CameraState::Live(stream);
                    self.notify("Camera enabled 📷");
                } else {
                    debug!(stream = %stream.id(), "Camera stream no longer wanted, releasing");
                    stream.stop_all();
                }
            }
            Outcome::Denied => {
                info!("Camera access denied");
                self.abandon_camera_request();
            }
            Outcome::Failed(reason) => {
                warn!(%reason, "Camera stream failed");
                self.abandon_camera_request();
            }
        }
    }

    fn abandon_camera_request(&mut self) {
        if matches!(self.camera, CameraState::Requesting) {
            self.camera = CameraState::Off;
        }
    }

    /// Explicit resolution of an [`Effect::SetFullscreen`].
    pub fn fullscreen_resolved(&mut self, target: bool, outcome: Outcome<()>) {
        if self.pending_fullscreen == Some(target) {
            self.pending_fullscreen = None;
        }
        match outcome {
            Outcome::Granted(()) => {
                self.fullscreen = target;
                info!(fullscreen = target, "Fullscreen changed");
                let message = if target {
                    "Fullscreen enabled 👌"
                } else {
                    "Fullscreen disabled 🤙 🤙"
                };
                self.notify(message);
            }
            Outcome::Denied => warn!(target, "Fullscreen request denied"),
            Outcome::Failed(reason) => warn!(target, %reason, "Fullscreen request failed"),
        }
    }

    /// Reports the window's actual fullscreen state.
    ///
    /// Confirms a pending request once the window reaches the target. With
    /// nothing pending, adopts changes made outside the controller (window
    /// manager shortcuts) without a notification.
    pub fn observe_fullscreen(&mut self, actual: bool) {
        match self.pending_fullscreen {
            Some(target) if actual == target => self.fullscreen_resolved(target, Outcome::Granted(())),
            Some(_) => {}
            None if actual != self.fullscreen => {
                debug!(fullscreen = actual, "Fullscreen changed outside the controller");
                self.fullscreen = actual;
            }
            None => {}
        }
    }

    /// Performs `effect` synchronously against `ports` and feeds the result
    /// back.
    pub fn run_effect(&mut self, effect: Effect, ports: &mut Ports<'_>) {
        trace!(?effect, "LightingController::run_effect");
        match effect {
            Effect::AcquireCamera(constraints) => {
                let outcome = Outcome::from(ports.media.open(&constraints));
                self.camera_resolved(outcome);
            }
            Effect::SetFullscreen(target) => match ports.fullscreen.request_fullscreen(target) {
                Ok(()) => {
                    if let Some(actual) = ports.fullscreen.is_fullscreen() {
                        self.observe_fullscreen(actual);
                    }
                }
                Err(e) => self.fullscreen_resolved(target, Outcome::Failed(e.to_string())),
            },
            Effect::OpenDuplicate => {
                if let Err(e) = ports.window.open_duplicate() {
                    warn!(error = %e, "Duplicate window failed");
                }
            }
        }
    }

    /// Dispatches `intent` and runs any resulting effect against `ports`.
    pub fn dispatch_with(&mut self, intent: Intent, ports: &mut Ports<'_>) {
        if let Some(effect) = self.dispatch(intent) {
            self.run_effect(effect, ports);
        }
    }
}
