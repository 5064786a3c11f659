//! Reset command - deletes the saved state.

use anyhow::{Context, Result};
use std::path::Path;

/// Removes the saved record; the next launch starts from the initial state.
pub fn run(data_dir: Option<&Path>) -> Result<()> {
    let mut store = super::open_store(data_dir)?;
    store.reset().context("Failed to delete saved state")?;
    println!("Saved state cleared");
    Ok(())
}
