//! Persisted application state.
//!
//! [`ApplicationState`] is the single record mirrored to durable storage after
//! every change. Field names are camelCase on disk. There is no schema version:
//! unknown fields are ignored, and the optional fields (`usePalette`,
//! `notification`) take their initial values when missing.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Transient user-facing feedback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Notification {
    /// Whether the notification is visible.
    pub show: bool,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// Visible notification with `message`.
    pub fn shown(message: impl Into<String>) -> Self {
        Self {
            show: true,
            message: message.into(),
        }
    }

    /// Hidden, empty notification.
    pub fn hidden() -> Self {
        Self::default()
    }
}

/// State shared by every window of the tool and persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    /// Saved baseline color. Changed only by an explicit save.
    pub default_color: Color,
    /// Color currently painted as the background.
    pub background_color: Color,
    /// Preset swatches instead of the freeform picker.
    #[serde(default)]
    pub use_palette: bool,
    /// Active notification.
    #[serde(default)]
    pub notification: Notification,
}

impl ApplicationState {
    /// State used when nothing (or nothing readable) is stored.
    pub fn initial() -> Self {
        Self {
            default_color: Color::TRANSPARENT_BLACK,
            background_color: Color::TRANSPARENT_BLACK,
            use_palette: false,
            notification: Notification::hidden(),
        }
    }
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let state = ApplicationState::initial();
        assert_eq!(state.background_color.to_hex(), "#000000");
        assert_eq!(state.background_color.alpha(), 0.0);
        assert_eq!(state.default_color, state.background_color);
        assert!(!state.use_palette);
        assert!(!state.notification.show);
    }

    #[test]
    fn camel_case_on_disk() {
        let json = serde_json::to_value(ApplicationState::initial()).unwrap();
        assert!(json.get("defaultColor").is_some());
        assert!(json.get("backgroundColor").is_some());
        assert_eq!(json["usePalette"], false);
        assert_eq!(json["notification"]["show"], false);
    }

    #[test]
    fn optional_fields_default() {
        let raw = r##"{
            "defaultColor": { "hex": "#ff0000" },
            "backgroundColor": { "rgb": { "r": 0, "g": 0, "b": 255, "a": 0.5 } },
            "futureField": 42
        }"##;
        let state: ApplicationState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.default_color, Color::rgb(255, 0, 0));
        assert_eq!(state.background_color, Color::rgba(0, 0, 255, 0.5));
        assert!(!state.use_palette);
        assert_eq!(state.notification, Notification::hidden());
    }

    #[test]
    fn missing_colors_are_rejected() {
        let raw = r#"{ "usePalette": true }"#;
        assert!(serde_json::from_str::<ApplicationState>(raw).is_err());
    }
}
