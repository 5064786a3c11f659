//! Behavioural tests for the lighting controller driven through fake ports.

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use softlight_core::prelude::*;
use softlight_core::{
    CameraState, CaptureConstraints, DeviceInfo, MESSAGES, MediaDevices, MediaError, MediaStream,
    MediaTrack, PlatformError, Ports, STORAGE_KEY, SequenceMessages,
};
use softlight_core::{Fullscreen, WindowOpener};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Debug)]
struct FakeTrack {
    label: String,
    live: Arc<AtomicBool>,
}

impl MediaTrack for FakeTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Camera rig that hands out streams whose tracks can be inspected later.
#[derive(Default)]
struct FakeCamera {
    devices: Vec<DeviceInfo>,
    deny: bool,
    issued: std::sync::Mutex<Vec<Arc<AtomicBool>>>,
}

impl FakeCamera {
    fn with_camera() -> Self {
        Self {
            devices: vec![DeviceInfo::video_input("cam0", "Front Camera")],
            ..Default::default()
        }
    }

    fn issued(&self) -> Vec<Arc<AtomicBool>> {
        self.issued.lock().unwrap().clone()
    }
}

impl MediaDevices for FakeCamera {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, MediaError> {
        Ok(self.devices.clone())
    }

    fn open(&self, constraints: &CaptureConstraints) -> Result<MediaStream, MediaError> {
        assert!(!constraints.audio);
        if self.deny {
            return Err(MediaError::PermissionDenied);
        }
        if self.devices.is_empty() {
            return Err(MediaError::NotFound);
        }
        let tracks: Vec<Box<dyn MediaTrack>> = (0..2)
            .map(|i| {
                let live = Arc::new(AtomicBool::new(true));
                self.issued.lock().unwrap().push(live.clone());
                Box::new(FakeTrack {
                    label: format!("track{i}"),
                    live,
                }) as Box<dyn MediaTrack>
            })
            .collect();
        Ok(MediaStream::new("fake-stream", tracks))
    }
}

#[derive(Default)]
struct FakeScreen {
    on: bool,
    refuse: bool,
}

impl Fullscreen for FakeScreen {
    fn request_fullscreen(&mut self, on: bool) -> Result<(), PlatformError> {
        if self.refuse {
            return Err(PlatformError::Unsupported("fullscreen"));
        }
        self.on = on;
        Ok(())
    }

    fn is_fullscreen(&self) -> Option<bool> {
        Some(self.on)
    }
}

#[derive(Default)]
struct FakeWindows {
    opened: Cell<u32>,
}

impl WindowOpener for FakeWindows {
    fn open_duplicate(&self) -> Result<(), PlatformError> {
        self.opened.set(self.opened.get() + 1);
        Ok(())
    }
}

fn fresh() -> LightingController<MemoryStorage> {
    LightingController::new(
        StateStore::load(MemoryStorage::new()),
        ControllerConfig::default(),
    )
}

// ============================================================================
// Lights out
// ============================================================================

#[test]
fn lights_out_twice_restores_color() {
    let samples = [
        Color::TRANSPARENT_BLACK,
        Color::OFF,
        Color::rgb(255, 0, 0),
        Color::rgba(12, 34, 56, 0.25),
        Color::rgba(255, 255, 255, 0.0),
        Color::from_hex("#c0ffee").unwrap(),
    ];

    for color in samples {
        let mut ctl = fresh();
        ctl.dispatch(Intent::ToggleEdit);
        ctl.dispatch(Intent::PickColor(color));

        ctl.dispatch(Intent::ToggleLightsOut);
        assert_eq!(ctl.state().background_color, Color::OFF);
        ctl.dispatch(Intent::ToggleLightsOut);

        assert_eq!(ctl.state().background_color, color, "{color}");
    }
}

#[test]
fn lights_out_restores_color_loaded_from_storage() {
    let storage = MemoryStorage::new();
    {
        let mut ctl = LightingController::new(
            StateStore::load(storage.clone()),
            ControllerConfig::default(),
        );
        ctl.dispatch(Intent::ToggleEdit);
        ctl.dispatch(Intent::PickColor(Color::rgb(1, 2, 3)));
    }

    let mut ctl = LightingController::new(StateStore::load(storage), ControllerConfig::default());
    ctl.dispatch(Intent::ToggleLightsOut);
    ctl.dispatch(Intent::ToggleLightsOut);
    assert_eq!(ctl.state().background_color, Color::rgb(1, 2, 3));
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn saved_default_survives_reload() {
    let storage = MemoryStorage::new();
    let mut ctl = LightingController::new(
        StateStore::load(storage.clone()),
        ControllerConfig::default(),
    );
    ctl.dispatch(Intent::TogglePalette(false));
    ctl.dispatch(Intent::PickColor(Color::rgba(10, 200, 30, 0.6)));
    let saved = ctl.state().background_color;
    ctl.dispatch(Intent::SaveDefault);

    let reloaded = StateStore::load(storage);
    assert_eq!(reloaded.state().default_color, saved);
    assert_eq!(reloaded.state().background_color, saved);
}

#[test]
fn malformed_record_starts_fresh() {
    let storage = MemoryStorage::with_entry(STORAGE_KEY, "{\"defaultColor\": oops");
    let ctl = LightingController::new(StateStore::load(storage), ControllerConfig::default());
    assert_eq!(ctl.state(), &ApplicationState::initial());
    assert_eq!(ctl.render_color(), "#00000000");
}

// ============================================================================
// Palette
// ============================================================================

#[test]
fn palette_toggle_always_shows_picker() {
    for start_visible in [false, true] {
        for target in [false, true] {
            let mut ctl = fresh();
            if start_visible {
                ctl.dispatch(Intent::ToggleEdit);
            }
            ctl.dispatch(Intent::TogglePalette(target));
            assert!(ctl.show_picker());
            assert_eq!(ctl.state().use_palette, target);
            assert!(ctl.message_index() < MESSAGES.len());
        }
    }
}

#[test]
fn palette_message_is_reselected_each_toggle() {
    let mut ctl = fresh().with_messages(SequenceMessages::new(vec![0, 8, 3]));
    let mut seen = Vec::new();
    for _ in 0..3 {
        ctl.dispatch(Intent::TogglePalette(true));
        seen.push(ctl.message_index());
    }
    assert_eq!(seen, vec![0, 8, 3]);
}

#[test]
fn random_palette_message_in_range() {
    let mut ctl = fresh();
    for _ in 0..200 {
        ctl.dispatch(Intent::TogglePalette(true));
        assert!(ctl.message_index() < MESSAGES.len());
    }
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn no_video_input_never_goes_live() {
    let camera = FakeCamera::default();
    let mut screen = FakeScreen::default();
    let windows = FakeWindows::default();
    let mut ctl = fresh();
    ctl.probe_camera(&camera);

    let mut ports = Ports {
        media: &camera,
        fullscreen: &mut screen,
        window: &windows,
    };
    ctl.dispatch_with(Intent::ToggleCamera, &mut ports);
    ctl.dispatch_with(Intent::ToggleCamera, &mut ports);

    assert!(!ctl.camera_available());
    assert!(!ctl.show_video());
    assert!(ctl.camera_stream().is_none());
    assert!(camera.issued().is_empty());
}

#[test]
fn disabling_preview_stops_every_track() {
    let camera = FakeCamera::with_camera();
    let mut screen = FakeScreen::default();
    let windows = FakeWindows::default();
    let mut ctl = fresh();
    ctl.probe_camera(&camera);
    assert!(ctl.camera_available());

    let mut ports = Ports {
        media: &camera,
        fullscreen: &mut screen,
        window: &windows,
    };
    ctl.dispatch_with(Intent::ToggleCamera, &mut ports);
    assert!(ctl.show_video());
    assert_eq!(ctl.camera_stream().map(MediaStream::live_tracks), Some(2));
    assert_eq!(ctl.notification().message, "Camera enabled 📷");

    ctl.dispatch_with(Intent::ToggleCamera, &mut ports);
    assert!(!ctl.show_video());
    assert!(ctl.camera_stream().is_none());
    assert!(matches!(ctl.camera(), CameraState::Off));
    assert_eq!(ctl.notification().message, "Camera disabled 👍");

    let issued = camera.issued();
    assert_eq!(issued.len(), 2);
    assert!(issued.iter().all(|live| !live.load(Ordering::SeqCst)));
}

#[test]
fn denied_camera_stays_off_silently() {
    let camera = FakeCamera {
        deny: true,
        ..FakeCamera::with_camera()
    };
    let mut screen = FakeScreen::default();
    let windows = FakeWindows::default();
    let mut ctl = fresh();
    ctl.probe_camera(&camera);

    let mut ports = Ports {
        media: &camera,
        fullscreen: &mut screen,
        window: &windows,
    };
    ctl.dispatch_with(Intent::ToggleCamera, &mut ports);

    assert!(matches!(ctl.camera(), CameraState::Off));
    assert!(!ctl.notification().show);
}

#[test]
fn late_stream_after_cancel_is_released() {
    let camera = FakeCamera::with_camera();
    let mut ctl = fresh();
    ctl.probe_camera(&camera);

    let effect = ctl.dispatch(Intent::ToggleCamera);
    assert!(matches!(effect, Some(Effect::AcquireCamera(_))));
    ctl.dispatch(Intent::ToggleCamera);

    let stream = camera.open(&CaptureConstraints::preview()).unwrap();
    ctl.camera_resolved(Outcome::Granted(stream));

    assert!(!ctl.show_video());
    assert!(camera.issued().iter().all(|live| !live.load(Ordering::SeqCst)));
}

#[test]
fn losing_camera_support_releases_stream() {
    let camera = FakeCamera::with_camera();
    let mut ctl = fresh();
    ctl.probe_camera(&camera);
    ctl.dispatch(Intent::ToggleCamera);
    ctl.camera_resolved(Outcome::Granted(
        camera.open(&CaptureConstraints::preview()).unwrap(),
    ));
    assert!(ctl.show_video());

    ctl.set_camera_supported(false);
    assert!(!ctl.camera_available());
    assert!(camera.issued().iter().all(|live| !live.load(Ordering::SeqCst)));
}

#[test]
fn dropping_controller_releases_camera() {
    let camera = FakeCamera::with_camera();
    let mut ctl = fresh();
    ctl.probe_camera(&camera);
    ctl.dispatch(Intent::ToggleCamera);
    ctl.camera_resolved(Outcome::Granted(
        camera.open(&CaptureConstraints::preview()).unwrap(),
    ));

    drop(ctl);
    assert!(camera.issued().iter().all(|live| !live.load(Ordering::SeqCst)));
}

// ============================================================================
// Fullscreen and windows
// ============================================================================

#[test]
fn fullscreen_round_trip_through_port() {
    let camera = FakeCamera::default();
    let mut screen = FakeScreen::default();
    let windows = FakeWindows::default();
    let mut ctl = fresh();

    {
        let mut ports = Ports {
            media: &camera,
            fullscreen: &mut screen,
            window: &windows,
        };
        ctl.dispatch_with(Intent::ToggleFullscreen, &mut ports);
        assert!(ctl.fullscreen());
        assert_eq!(ctl.notification().message, "Fullscreen enabled 👌");

        ctl.dispatch_with(Intent::ToggleFullscreen, &mut ports);
        assert!(!ctl.fullscreen());
        assert_eq!(ctl.notification().message, "Fullscreen disabled 🤙 🤙");
    }
    assert!(!screen.on);
}

#[test]
fn refused_fullscreen_leaves_flag_off() {
    let camera = FakeCamera::default();
    let mut screen = FakeScreen {
        refuse: true,
        ..Default::default()
    };
    let windows = FakeWindows::default();
    let mut ctl = fresh();

    let mut ports = Ports {
        media: &camera,
        fullscreen: &mut screen,
        window: &windows,
    };
    ctl.dispatch_with(Intent::ToggleFullscreen, &mut ports);
    assert!(!ctl.fullscreen());
    assert_eq!(ctl.pending_fullscreen(), None);

    // A later request is still possible.
    assert_eq!(
        ctl.dispatch(Intent::ToggleFullscreen),
        Some(Effect::SetFullscreen(true))
    );
}

#[test]
fn duplicate_window_opens_once_per_gesture() {
    let camera = FakeCamera::default();
    let mut screen = FakeScreen::default();
    let windows = FakeWindows::default();
    let mut ctl = fresh();

    let mut ports = Ports {
        media: &camera,
        fullscreen: &mut screen,
        window: &windows,
    };
    ctl.dispatch_with(Intent::DuplicateWindow, &mut ports);
    ctl.dispatch_with(Intent::DuplicateWindow, &mut ports);
    assert_eq!(windows.opened.get(), 2);
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn first_run_pick_and_save() {
    let storage = MemoryStorage::new();
    let mut ctl = LightingController::new(
        StateStore::load(storage.clone()),
        ControllerConfig::default(),
    );

    assert_eq!(ctl.state().background_color.to_hex(), "#000000");
    assert_eq!(ctl.state().background_color.alpha(), 0.0);
    assert_eq!(ctl.render_color(), "#00000000");

    ctl.dispatch(Intent::ToggleEdit);
    let red: Color = serde_json::from_str(r##"{"hex":"#ff0000","rgb":{"r":255,"g":0,"b":0,"a":1}}"##)
        .unwrap();
    ctl.dispatch(Intent::PickColor(red));
    assert_eq!(ctl.render_color(), "#ff0000ff");

    ctl.dispatch(Intent::SaveDefault);
    assert_eq!(ctl.state().default_color.to_hex(), "#ff0000");
    assert!(ctl.notification().show);
    assert_eq!(
        ctl.notification().message,
        "Saved default soft light as #ff0000ff 😎"
    );

    let reloaded = StateStore::load(storage);
    assert_eq!(reloaded.state().default_color.to_hex(), "#ff0000");
}
