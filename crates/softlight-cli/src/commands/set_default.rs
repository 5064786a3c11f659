//! Set-default command - saves a default color without the window.

use anyhow::{Context, Result};
use softlight_core::Color;
use std::path::Path;
use tracing::info;

use crate::SetDefaultArgs;

/// Stores `args.color` as both default and current background.
pub fn run(args: SetDefaultArgs, data_dir: Option<&Path>) -> Result<()> {
    let color: Color = args
        .color
        .parse()
        .with_context(|| format!("Invalid color: {}", args.color))?;

    let mut store = super::open_store(data_dir)?;
    store
        .try_apply(|s| {
            s.default_color = color;
            s.background_color = color;
        })
        .context("Failed to save state")?;

    info!(color = %color, "Default color saved");
    println!("Saved default soft light as {}", color.render_string());
    Ok(())
}
