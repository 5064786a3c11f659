//! Run command - opens the soft light window.

use anyhow::Result;
use std::path::Path;

use crate::RunArgs;

/// Run the window and exit with its status.
#[cfg(feature = "viewer")]
pub fn run(args: RunArgs, data_dir: Option<&Path>) -> Result<()> {
    use std::ffi::OsString;
    use std::time::Duration;

    use softlight_view::{DuplicateCommand, ViewerConfig};
    use tracing::warn;

    // Duplicates share this window's storage.
    let mut dup_args: Vec<OsString> = vec!["run".into()];
    if let Some(dir) = data_dir {
        dup_args.push("--data-dir".into());
        dup_args.push(dir.as_os_str().to_owned());
    }
    let duplicate = match DuplicateCommand::current_exe(dup_args) {
        Ok(cmd) => Some(cmd),
        Err(e) => {
            warn!(error = %e, "Duplicate windows disabled");
            None
        }
    };

    let config = ViewerConfig {
        data_dir: data_dir.map(Path::to_path_buf),
        fullscreen: args.fullscreen,
        notification_timeout: args.notification_ms.map(Duration::from_millis),
        duplicate,
    };

    let exit_code = softlight_view::run(config);

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

/// Without the viewer there is no window to open.
#[cfg(not(feature = "viewer"))]
pub fn run(_args: RunArgs, _data_dir: Option<&Path>) -> Result<()> {
    anyhow::bail!("softlight was built without the `viewer` feature")
}
