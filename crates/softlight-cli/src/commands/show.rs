//! Show command - prints the saved state.

use anyhow::{Context, Result};
use softlight_core::{ApplicationState, Color, STORAGE_KEY};
use std::path::Path;

use crate::ShowArgs;

/// Prints the saved state, or the initial state when nothing valid is saved.
pub fn run(args: ShowArgs, data_dir: Option<&Path>) -> Result<()> {
    let store = super::open_store(data_dir)?;

    if args.json {
        let json = serde_json::to_string_pretty(store.state())
            .context("Failed to serialize state")?;
        println!("{json}");
    } else {
        let path = store.storage().path_for(STORAGE_KEY)?;
        print_text(store.state(), &path);
    }

    Ok(())
}

fn describe(color: Color) -> String {
    format!("{} (alpha {:.2})", color.to_hex(), color.alpha())
}

fn print_text(state: &ApplicationState, path: &Path) {
    println!("File:         {}", path.display());
    println!("Default:      {}", describe(state.default_color));
    println!("Background:   {}", describe(state.background_color));
    println!("Render:       {}", state.background_color.render_string());
    println!(
        "Picker:       {}",
        if state.use_palette { "palette" } else { "freeform" }
    );
    if state.notification.show {
        println!("Notification: {}", state.notification.message);
    }
}
