//! # softlight-view
//!
//! Desktop window for the soft light: the whole window is painted with the
//! chosen color so the display lights your face during video calls.
//!
//! Features:
//! - Freeform color picker with alpha, or preset swatches
//! - Save the current color as the default for the next launch
//! - Lights out (black) and back
//! - Camera check through a live preview when a camera is present
//! - Fullscreen and duplicate windows
//! - Auto-hiding notifications
//!
//! # Quick Start
//!
//! ```ignore
//! use softlight_view::{run, ViewerConfig};
//!
//! let exit_code = run(ViewerConfig::default());
//! ```
//!
//! # Keyboard Shortcuts
//!
//! | Key | Action |
//! |-----|--------|
//! | `F` | Toggle fullscreen |
//! | `N` | New window |
//! | `L` | Lights out |
//! | `C` | Camera preview |
//! | `E` | Toggle edit (picker) |
//! | `K` | Freeform picker |
//! | `P` | Swatch palette |
//! | `S` | Save default |
//! | `Esc` | Leave fullscreen |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod app;
#[cfg(feature = "camera")]
mod camera;
mod handler;
mod messages;
mod palette;
mod state;
mod window;

pub use app::{SoftLightApp, ViewerConfig};
#[cfg(feature = "camera")]
pub use camera::{GstCamera, PREVIEW_WIDTH};
pub use palette::SWATCHES;
pub use state::Action;
pub use window::{DuplicateCommand, NoDuplicate, ViewportFullscreen};

use std::path::PathBuf;

use softlight_core::{FileStorage, MemoryStorage, Storage};
use tracing::{debug, error, info, warn};

/// Window title.
pub const TITLE: &str = "soft light";

/// Opens the storage backend for `config`.
///
/// Falls back to an in-memory store when no config directory exists; the
/// session then works but nothing survives a restart.
pub fn open_storage(config: &ViewerConfig) -> Box<dyn Storage> {
    let storage = match &config.data_dir {
        Some(dir) => Ok(FileStorage::new(dir)),
        None => FileStorage::in_config_dir(),
    };
    match storage {
        Ok(storage) => {
            debug!(dir = %storage.dir().display(), "Using file storage");
            Box::new(storage)
        }
        Err(e) => {
            warn!(error = %e, "No state directory, settings will not persist");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Run the soft light window.
///
/// Creates an eframe window and enters the event loop. Returns the exit
/// code when the window closes: 0 for success, 1 for error.
pub fn run(config: ViewerConfig) -> i32 {
    let storage = open_storage(&config);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([360.0, 480.0])
            .with_fullscreen(config.fullscreen),
        persistence_path: persistence_path(&config),
        ..Default::default()
    };

    info!(fullscreen = config.fullscreen, "Opening window");
    let result = eframe::run_native(
        TITLE,
        native_options,
        Box::new(move |_cc| Ok(Box::new(SoftLightApp::new(storage, config)))),
    );

    match result {
        Ok(()) => {
            debug!("Window closed");
            0
        }
        Err(e) => {
            error!(error = %e, "Window error");
            1
        }
    }
}

/// Where eframe keeps window geometry.
fn persistence_path(config: &ViewerConfig) -> Option<PathBuf> {
    config
        .data_dir
        .clone()
        .or_else(softlight_core::storage::default_dir)
        .map(|p| p.join("window"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use softlight_core::STORAGE_KEY;

    #[test]
    fn viewer_config_default() {
        let config = ViewerConfig::default();
        assert!(config.data_dir.is_none());
        assert!(!config.fullscreen);
        assert!(config.duplicate.is_none());
    }

    #[test]
    fn storage_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let mut storage = open_storage(&config);
        storage.write(STORAGE_KEY, "{}").unwrap();
        assert!(dir.path().join(format!("{STORAGE_KEY}.json")).exists());
    }

    #[test]
    fn window_state_lives_next_to_data() {
        let config = ViewerConfig {
            data_dir: Some(PathBuf::from("/tmp/softlight-test")),
            ..Default::default()
        };
        assert_eq!(
            persistence_path(&config),
            Some(PathBuf::from("/tmp/softlight-test/window"))
        );
    }
}
