//! CLI command implementations

pub mod reset;
pub mod run;
pub mod set_default;
pub mod show;

use anyhow::{Context, Result};
use softlight_core::{FileStorage, StateStore};
use std::path::Path;

/// File storage in `data_dir`, or the platform config dir.
pub fn open_storage(data_dir: Option<&Path>) -> Result<FileStorage> {
    match data_dir {
        Some(dir) => Ok(FileStorage::new(dir)),
        None => FileStorage::in_config_dir().context("Failed to locate the state directory"),
    }
}

/// Loads the saved state (initial state when absent or unreadable).
pub fn open_store(data_dir: Option<&Path>) -> Result<StateStore<FileStorage>> {
    Ok(StateStore::load(open_storage(data_dir)?))
}
