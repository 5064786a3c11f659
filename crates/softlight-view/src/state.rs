//! Toolbar actions and runtime window state.

use std::time::{Duration, Instant};

use softlight_core::Intent;

/// How long a fullscreen request may take before it counts as refused.
pub const FULLSCREEN_CONFIRM_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a worker error stays in the status line.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(8);

/// Toolbar action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Enter or leave fullscreen.
    Fullscreen,
    /// Open another window.
    Duplicate,
    /// Toggle lights out.
    LightsOut,
    /// Toggle the camera preview.
    Camera,
    /// Toggle edit mode.
    Edit,
    /// Switch to the freeform picker.
    Picker,
    /// Switch to preset swatches.
    Palette,
    /// Save the current color as default.
    Save,
}

impl Action {
    /// Display label for UI.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fullscreen => "Fullscreen",
            Self::Duplicate => "New window",
            Self::LightsOut => "Lights out",
            Self::Camera => "Camera",
            Self::Edit => "Edit",
            Self::Picker => "Picker",
            Self::Palette => "Palette",
            Self::Save => "Save",
        }
    }

    /// Keyboard shortcut hint.
    pub const fn shortcut(self) -> &'static str {
        match self {
            Self::Fullscreen => "F",
            Self::Duplicate => "N",
            Self::LightsOut => "L",
            Self::Camera => "C",
            Self::Edit => "E",
            Self::Picker => "K",
            Self::Palette => "P",
            Self::Save => "S",
        }
    }

    /// Key bound to the action.
    pub const fn key(self) -> egui::Key {
        match self {
            Self::Fullscreen => egui::Key::F,
            Self::Duplicate => egui::Key::N,
            Self::LightsOut => egui::Key::L,
            Self::Camera => egui::Key::C,
            Self::Edit => egui::Key::E,
            Self::Picker => egui::Key::K,
            Self::Palette => egui::Key::P,
            Self::Save => egui::Key::S,
        }
    }

    /// All actions, in toolbar order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Fullscreen,
            Self::Duplicate,
            Self::LightsOut,
            Self::Camera,
            Self::Edit,
            Self::Picker,
            Self::Palette,
            Self::Save,
        ]
    }

    /// Gesture the action stands for.
    pub const fn intent(self) -> Intent {
        match self {
            Self::Fullscreen => Intent::ToggleFullscreen,
            Self::Duplicate => Intent::DuplicateWindow,
            Self::LightsOut => Intent::ToggleLightsOut,
            Self::Camera => Intent::ToggleCamera,
            Self::Edit => Intent::ToggleEdit,
            Self::Picker => Intent::TogglePalette(false),
            Self::Palette => Intent::TogglePalette(true),
            Self::Save => Intent::SaveDefault,
        }
    }
}

/// Runtime window state (not persisted).
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Pending fullscreen target and when it was requested.
    pub fullscreen_request: Option<(bool, Instant)>,
    /// Last worker error shown in the status line, with when it arrived.
    status: Option<(String, Instant)>,
}

impl ViewState {
    /// Starts waiting for the window to reach `target`.
    pub fn await_fullscreen(&mut self, target: bool, now: Instant) {
        self.fullscreen_request = Some((target, now));
    }

    /// Target of a request that has waited longer than the confirm timeout.
    pub fn overdue_fullscreen(&self, now: Instant) -> Option<bool> {
        self.fullscreen_request
            .filter(|(_, at)| now.saturating_duration_since(*at) >= FULLSCREEN_CONFIRM_TIMEOUT)
            .map(|(target, _)| target)
    }

    /// Shows `reason` in the status line.
    pub fn report_failure(&mut self, reason: String, now: Instant) {
        self.status = Some((reason, now));
    }

    /// Clears the status line; called on every new gesture.
    pub fn acknowledge(&mut self) {
        self.status = None;
    }

    /// Status text still worth showing at `now`.
    pub fn status(&self, now: Instant) -> Option<&str> {
        self.status_remaining(now)?;
        self.status.as_ref().map(|(reason, _)| reason.as_str())
    }

    /// Time until the status line expires.
    pub fn status_remaining(&self, now: Instant) -> Option<Duration> {
        let (_, at) = self.status.as_ref()?;
        STATUS_TIMEOUT
            .checked_sub(now.saturating_duration_since(*at))
            .filter(|d| !d.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_labels() {
        assert_eq!(Action::LightsOut.label(), "Lights out");
        assert_eq!(Action::Save.shortcut(), "S");
        assert_eq!(Action::all().len(), 8);
    }

    #[test]
    fn shortcuts_are_unique() {
        let mut keys: Vec<_> = Action::all().iter().map(|a| a.shortcut()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Action::all().len());
    }

    #[test]
    fn palette_actions_map_to_mode() {
        assert_eq!(Action::Palette.intent(), Intent::TogglePalette(true));
        assert_eq!(Action::Picker.intent(), Intent::TogglePalette(false));
        assert_eq!(Action::Save.intent(), Intent::SaveDefault);
    }

    #[test]
    fn fullscreen_request_goes_overdue() {
        let start = Instant::now();
        let mut view = ViewState::default();
        assert_eq!(view.overdue_fullscreen(start), None);

        view.await_fullscreen(true, start);
        assert_eq!(view.overdue_fullscreen(start), None);
        assert_eq!(
            view.overdue_fullscreen(start + FULLSCREEN_CONFIRM_TIMEOUT),
            Some(true)
        );
    }

    #[test]
    fn status_clears_on_gesture_or_timeout() {
        let start = Instant::now();
        let mut view = ViewState::default();
        assert_eq!(view.status(start), None);

        view.report_failure("spawn failed".into(), start);
        assert_eq!(view.status(start), Some("spawn failed"));
        assert_eq!(view.status_remaining(start), Some(STATUS_TIMEOUT));
        assert_eq!(view.status(start + STATUS_TIMEOUT), None);
        assert_eq!(view.status_remaining(start + STATUS_TIMEOUT), None);

        view.report_failure("spawn failed".into(), start);
        view.acknowledge();
        assert_eq!(view.status(start), None);
    }
}
