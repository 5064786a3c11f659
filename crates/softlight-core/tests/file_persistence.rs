//! State store against the on-disk backend.

use std::fs;

use softlight_core::prelude::*;
use softlight_core::STORAGE_KEY;

fn record_path(storage: &FileStorage) -> std::path::PathBuf {
    storage.path_for(STORAGE_KEY).unwrap()
}

#[test]
fn every_change_rewrites_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let path = record_path(&storage);

    let mut ctl = LightingController::new(StateStore::load(storage), ControllerConfig::default());
    assert!(!path.exists(), "loading alone must not write");

    ctl.dispatch(Intent::TogglePalette(true));
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"usePalette\":true"));

    ctl.dispatch(Intent::PickColor(Color::rgb(0, 128, 255)));
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"hex\":\"#0080ff\""));
}

#[test]
fn reload_sees_saved_default() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut ctl = LightingController::new(
            StateStore::load(FileStorage::new(dir.path())),
            ControllerConfig::default(),
        );
        ctl.dispatch(Intent::ToggleEdit);
        ctl.dispatch(Intent::PickColor(Color::rgba(250, 200, 150, 0.9)));
        ctl.dispatch(Intent::SaveDefault);
    }

    let store = StateStore::load(FileStorage::new(dir.path()));
    assert_eq!(store.state().default_color, Color::rgba(250, 200, 150, 0.9));
    assert!(store.state().notification.show);
}

#[test]
fn truncated_record_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    fs::write(record_path(&storage), "{\"defaultColor\":{\"hex\":\"#ff").unwrap();

    let store = StateStore::load(storage);
    assert_eq!(store.state(), &ApplicationState::initial());
}

#[test]
fn legacy_record_shape_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let legacy = r##"{
        "defaultColor": {
            "hex": "#4a90e2",
            "hsl": { "h": 212.0, "s": 0.72, "l": 0.59, "a": 1 },
            "rgb": { "r": 74, "g": 144, "b": 226, "a": 1 },
            "oldPickerField": true
        },
        "backgroundColor": {
            "hex": "#000000",
            "hsl": { "h": 0, "s": 0, "l": 0, "a": 0 },
            "rgb": { "r": 0, "g": 0, "b": 0, "a": 0 }
        },
        "usePalette": true,
        "notification": { "message": "Edit mode enabled", "show": false }
    }"##;
    fs::write(record_path(&storage), legacy).unwrap();

    let store = StateStore::load(storage);
    assert_eq!(store.state().default_color, Color::rgb(74, 144, 226));
    assert_eq!(store.state().background_color, Color::TRANSPARENT_BLACK);
    assert!(store.state().use_palette);
}

#[test]
fn reset_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = StateStore::load(FileStorage::new(dir.path()));
    store.apply(|s| s.use_palette = true);
    let path = record_path(store.storage());
    assert!(path.exists());

    store.reset().unwrap();
    assert!(!path.exists());
}
