//! Main window with eframe/egui integration.
//!
//! Paints the soft light color and routes every gesture through the
//! [`LightingController`]. Blocking host work runs on the worker thread.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use egui::{Align2, Color32, RichText};
use softlight_core::{
    CameraState, CloseReason, ControllerConfig, Effect, Fullscreen, Intent, LightingController,
    MediaDevices, Outcome, StateStore, Storage, VideoFrame,
};
use tracing::{debug, trace, warn};

use crate::handler::HostHandler;
use crate::messages::{HostEvent, HostMsg};
use crate::palette::{from_color32, swatch_grid, to_color32};
use crate::state::{Action, ViewState};
use crate::window::{DuplicateCommand, NoDuplicate, ViewportFullscreen};

/// Page color under the tint; a transparent soft light shows this.
const BASE_COLOR: Color32 = Color32::WHITE;

/// Repaint interval while waiting on the window manager.
const FULLSCREEN_POLL: Duration = Duration::from_millis(100);

/// Repaint interval while the camera preview is live.
const CAMERA_FRAME: Duration = Duration::from_millis(33);

/// On-screen width of the camera preview.
const CAMERA_PREVIEW_WIDTH: f32 = 320.0;

/// Configuration for launching the window.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// State directory override (default: platform config dir).
    pub data_dir: Option<PathBuf>,
    /// Start in fullscreen.
    pub fullscreen: bool,
    /// Notification auto-hide override.
    pub notification_timeout: Option<Duration>,
    /// How to launch a duplicate window (`None` disables it).
    pub duplicate: Option<DuplicateCommand>,
}

impl ViewerConfig {
    /// Controller settings derived from this config.
    pub fn controller_config(&self) -> ControllerConfig {
        let mut config = ControllerConfig::default();
        if let Some(timeout) = self.notification_timeout {
            config.notification_timeout = timeout;
        }
        config
    }
}

/// Main soft light application.
pub struct SoftLightApp {
    /// Sender for requests to the worker thread.
    tx: Sender<HostMsg>,
    /// Receiver for results from the worker thread.
    rx: Receiver<HostEvent>,
    /// Worker thread handle (Option for Drop).
    worker: Option<JoinHandle<()>>,

    lights: LightingController<Box<dyn Storage>>,
    view: ViewState,
    /// Last uploaded camera frame (sequence, texture).
    camera_texture: Option<(u64, egui::TextureHandle)>,
}

#[cfg(feature = "camera")]
fn camera_backend() -> impl MediaDevices + Send + 'static {
    crate::camera::GstCamera::new()
}

#[cfg(not(feature = "camera"))]
fn camera_backend() -> impl MediaDevices + Send + 'static {
    softlight_core::NoMediaDevices
}

impl SoftLightApp {
    /// Creates the application over `storage`.
    pub fn new(storage: Box<dyn Storage>, config: ViewerConfig) -> Self {
        let (tx_to_worker, rx_in_worker) = channel();
        let (tx_to_ui, rx_from_worker) = channel();

        let duplicate = config.duplicate.clone();
        let worker = thread::spawn(move || match duplicate {
            Some(cmd) => HostHandler::new(rx_in_worker, tx_to_ui, camera_backend(), cmd).run(),
            None => HostHandler::new(rx_in_worker, tx_to_ui, camera_backend(), NoDuplicate).run(),
        });

        let lights = LightingController::new(StateStore::load(storage), config.controller_config());

        let app = Self {
            tx: tx_to_worker,
            rx: rx_from_worker,
            worker: Some(worker),
            lights,
            view: ViewState::default(),
            camera_texture: None,
        };
        app.send(HostMsg::ProbeCamera);
        app
    }

    /// Controller driving the window.
    pub const fn lights(&self) -> &LightingController<Box<dyn Storage>> {
        &self.lights
    }

    fn send(&self, msg: HostMsg) {
        let _ = self.tx.send(msg);
    }

    // =========================================================================
    // Gestures and effects
    // =========================================================================

    fn dispatch(&mut self, ctx: &egui::Context, intent: Intent) {
        self.view.acknowledge();
        if let Some(effect) = self.lights.dispatch(intent) {
            self.perform(ctx, effect);
        }
    }

    fn perform(&mut self, ctx: &egui::Context, effect: Effect) {
        debug!(?effect, "Performing effect");
        match effect {
            Effect::AcquireCamera(constraints) => self.send(HostMsg::AcquireCamera(constraints)),
            Effect::OpenDuplicate => self.send(HostMsg::OpenDuplicate),
            Effect::SetFullscreen(target) => {
                let mut port = ViewportFullscreen::new(ctx);
                match port.request_fullscreen(target) {
                    Ok(()) => self.view.await_fullscreen(target, Instant::now()),
                    Err(e) => self
                        .lights
                        .fullscreen_resolved(target, Outcome::Failed(e.to_string())),
                }
            }
        }
    }

    /// Process all pending events from the worker.
    fn process_events(&mut self) -> bool {
        let mut had_events = false;
        while let Ok(event) = self.rx.try_recv() {
            had_events = true;
            match event {
                HostEvent::CameraProbed(supported) => self.lights.set_camera_supported(supported),
                HostEvent::CameraResolved(outcome) => self.lights.camera_resolved(outcome),
                HostEvent::DuplicateFailed(reason) => {
                    self.view.report_failure(reason, Instant::now());
                }
            }
        }
        had_events
    }

    /// Feeds the window's fullscreen state back and gives up on requests
    /// the window manager never honored.
    fn sync_fullscreen(&mut self, ctx: &egui::Context, now: Instant) {
        if let Some(actual) = ViewportFullscreen::new(ctx).is_fullscreen() {
            self.lights.observe_fullscreen(actual);
        }
        if self.lights.pending_fullscreen().is_none() {
            self.view.fullscreen_request = None;
        } else if let Some(target) = self.view.overdue_fullscreen(now) {
            warn!(target, "Window did not change fullscreen state");
            self.view.fullscreen_request = None;
            self.lights
                .fullscreen_resolved(target, Outcome::Failed("no response from window".into()));
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let mut fired = Vec::new();
        ctx.input(|i| {
            if i.modifiers.ctrl || i.modifiers.command {
                return;
            }
            for &action in Action::all() {
                if i.key_pressed(action.key()) {
                    fired.push(action);
                }
            }
            if i.key_pressed(egui::Key::Escape) && self.lights.fullscreen() {
                fired.push(Action::Fullscreen);
            }
        });
        for action in fired {
            if action == Action::Camera && !self.lights.camera_available() {
                continue;
            }
            self.dispatch(ctx, action.intent());
        }
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    fn action_button(&mut self, ui: &mut egui::Ui, action: Action, text: &str) {
        let hint = format!("{} ({})", action.label(), action.shortcut());
        if ui.button(text).on_hover_text(hint).clicked() {
            self.dispatch(ui.ctx(), action.intent());
        }
    }

    /// Draw top app bar.
    fn draw_appbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("appbar")
            .frame(egui::Frame::none().inner_margin(12.0))
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("soft light").size(18.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.action_button(ui, Action::Edit, "✏");
                        if self.lights.camera_available() {
                            let icon = if self.lights.show_video() { "📷 off" } else { "📷" };
                            self.action_button(ui, Action::Camera, icon);
                        }
                        self.action_button(ui, Action::LightsOut, "⏻");
                        self.action_button(ui, Action::Duplicate, "🗗");
                        let icon = if self.lights.fullscreen() { "🗕" } else { "⛶" };
                        self.action_button(ui, Action::Fullscreen, icon);
                    });
                });
            });
    }

    /// Draw bottom toolbar.
    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("toolbar")
            .frame(egui::Frame::none().inner_margin(12.0))
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    self.action_button(ui, Action::Picker, "🖊");
                    ui.add_space(8.0);
                    self.action_button(ui, Action::Save, "💾");
                    ui.add_space(8.0);
                    self.action_button(ui, Action::Palette, "🎨");
                    if let Some(status) = self.view.status(Instant::now()) {
                        ui.separator();
                        ui.colored_label(Color32::DARK_RED, status);
                    }
                });
            });
    }

    /// Draw the lit area with camera preview, message and picker.
    fn draw_canvas(&mut self, ctx: &egui::Context) {
        let background = self.lights.state().background_color;
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    self.draw_camera(ui);

                    if !self.lights.show_picker() {
                        return;
                    }

                    ui.add_space(16.0);
                    ui.label(RichText::new(self.lights.message()).size(20.0));
                    ui.add_space(16.0);

                    let picked = if self.lights.state().use_palette {
                        swatch_grid(ui, background)
                    } else {
                        let mut color = to_color32(background);
                        let changed = egui::color_picker::color_picker_color32(
                            ui,
                            &mut color,
                            egui::color_picker::Alpha::OnlyBlend,
                        );
                        changed.then(|| from_color32(color))
                    };
                    if let Some(color) = picked {
                        self.dispatch(ui.ctx(), Intent::PickColor(color));
                    }
                });
            });
    }

    fn draw_camera(&mut self, ui: &mut egui::Ui) {
        let frame = match self.lights.camera() {
            CameraState::Live(stream) => stream.latest_frame(),
            CameraState::Requesting => {
                self.camera_texture = None;
                ui.add(egui::Spinner::new());
                return;
            }
            CameraState::Unavailable | CameraState::Off => {
                self.camera_texture = None;
                return;
            }
        };
        if let Some(frame) = frame {
            self.upload_frame(ui.ctx(), &frame);
        }

        match &self.camera_texture {
            Some((_, texture)) => {
                let [w, h] = texture.size();
                let height = CAMERA_PREVIEW_WIDTH * h as f32 / w.max(1) as f32;
                let size = egui::vec2(CAMERA_PREVIEW_WIDTH, height);
                ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), size)));
            }
            // Live, first frame not decoded yet
            None => {
                ui.add(egui::Spinner::new());
            }
        }
    }

    /// Uploads `frame` unless it is already on the GPU.
    fn upload_frame(&mut self, ctx: &egui::Context, frame: &VideoFrame) {
        if self
            .camera_texture
            .as_ref()
            .is_some_and(|(seq, _)| *seq == frame.sequence)
        {
            return;
        }
        trace!(sequence = frame.sequence, "Uploading camera frame");
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.pixels,
        );
        match &mut self.camera_texture {
            Some((seq, texture)) => {
                texture.set(image, egui::TextureOptions::LINEAR);
                *seq = frame.sequence;
            }
            None => {
                let texture = ctx.load_texture("camera", image, egui::TextureOptions::LINEAR);
                self.camera_texture = Some((frame.sequence, texture));
            }
        }
    }

    /// Draw the notification in the top-right corner. Clicks elsewhere count
    /// as a click-away.
    fn draw_notification(&mut self, ctx: &egui::Context) {
        let notification = self.lights.notification();
        if !notification.show {
            return;
        }
        let message = notification.message.clone();

        let mut close = false;
        let area = egui::Area::new(egui::Id::new("notification"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 64.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(Color32::from_rgb(237, 247, 237))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(Color32::from_rgb(30, 70, 32), &message);
                            close = ui.small_button("✖").clicked();
                        });
                    });
            });

        if close {
            self.dispatch(ctx, Intent::DismissNotification(CloseReason::User));
        } else if ctx.input(|i| i.pointer.any_click()) && !area.response.hovered() {
            self.dispatch(ctx, Intent::DismissNotification(CloseReason::ClickAway));
        }
    }
}

impl eframe::App for SoftLightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let had_events = self.process_events();
        self.sync_fullscreen(ctx, now);
        self.lights.tick(now);

        self.handle_input(ctx);

        // Base page, then the soft light on top.
        let background = to_color32(self.lights.state().background_color);
        let screen = ctx.screen_rect();
        let painter = ctx.layer_painter(egui::LayerId::background());
        painter.rect_filled(screen, 0.0, BASE_COLOR);
        painter.rect_filled(screen, 0.0, background);

        self.draw_appbar(ctx);
        self.draw_toolbar(ctx);
        self.draw_canvas(ctx);
        self.draw_notification(ctx);

        if had_events {
            ctx.request_repaint();
        }
        if self.view.fullscreen_request.is_some() {
            ctx.request_repaint_after(FULLSCREEN_POLL);
        }
        if let Some(remaining) = self.lights.notification_remaining(now) {
            ctx.request_repaint_after(remaining);
        }
        if let Some(remaining) = self.view.status_remaining(now) {
            ctx.request_repaint_after(remaining);
        }
        if matches!(self.lights.camera(), CameraState::Live(_)) {
            ctx.request_repaint_after(CAMERA_FRAME);
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        BASE_COLOR.to_normalized_gamma_f32()
    }
}

impl Drop for SoftLightApp {
    fn drop(&mut self) {
        // Signal worker to stop
        let _ = self.tx.send(HostMsg::Close);

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softlight_core::MemoryStorage;
    use std::sync::Arc;

    #[test]
    fn controller_config_override() {
        let config = ViewerConfig {
            notification_timeout: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        assert_eq!(
            config.controller_config().notification_timeout,
            Duration::from_secs(1)
        );
        assert_eq!(
            ViewerConfig::default().controller_config(),
            ControllerConfig::default()
        );
    }

    #[test]
    fn app_loads_stored_state_and_stops_worker() {
        let storage = MemoryStorage::with_entry(
            softlight_core::STORAGE_KEY,
            r##"{"defaultColor":{"hex":"#ff0000"},"backgroundColor":{"hex":"#00ff00"}}"##,
        );
        let app = SoftLightApp::new(Box::new(storage), ViewerConfig::default());
        assert_eq!(app.lights().render_color(), "#00ff00ff");
        drop(app);
    }

    fn frame(sequence: u64, width: u32, height: u32) -> VideoFrame {
        VideoFrame {
            sequence,
            width,
            height,
            pixels: Arc::from(vec![128u8; (width * height * 4) as usize]),
        }
    }

    #[test]
    fn camera_frames_upload_once_per_sequence() {
        let ctx = egui::Context::default();
        let mut app = SoftLightApp::new(Box::new(MemoryStorage::new()), ViewerConfig::default());

        app.upload_frame(&ctx, &frame(1, 4, 2));
        let (seq, texture) = app.camera_texture.as_ref().unwrap();
        assert_eq!(*seq, 1);
        assert_eq!(texture.size(), [4, 2]);
        let id = texture.id();

        app.upload_frame(&ctx, &frame(2, 8, 6));
        let (seq, texture) = app.camera_texture.as_ref().unwrap();
        assert_eq!(*seq, 2);
        assert_eq!(texture.size(), [8, 6]);
        assert_eq!(texture.id(), id);
    }
}
