//! Window ports: viewport fullscreen and duplicate instances.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use softlight_core::{Fullscreen, PlatformError, WindowOpener};
use tracing::{debug, info, warn};

// =============================================================================
// Fullscreen
// =============================================================================

/// Fullscreen through egui viewport commands.
///
/// The command takes effect on a later frame; [`Fullscreen::is_fullscreen`]
/// reports what the window currently is.
pub struct ViewportFullscreen<'a> {
    ctx: &'a egui::Context,
}

impl<'a> ViewportFullscreen<'a> {
    /// Port for the root viewport of `ctx`.
    pub const fn new(ctx: &'a egui::Context) -> Self {
        Self { ctx }
    }
}

impl Fullscreen for ViewportFullscreen<'_> {
    fn request_fullscreen(&mut self, on: bool) -> Result<(), PlatformError> {
        debug!(on, "Sending fullscreen viewport command");
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(on));
        Ok(())
    }

    fn is_fullscreen(&self) -> Option<bool> {
        self.ctx.input(|i| i.viewport().fullscreen)
    }
}

// =============================================================================
// Duplicate window
// =============================================================================

/// Opens another window by launching a new process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl DuplicateCommand {
    /// Runs `program` with `args`.
    pub fn new<I, A>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Re-runs the current executable with `args`.
    pub fn current_exe<I, A>(args: I) -> Result<Self, PlatformError>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        let program = std::env::current_exe().map_err(PlatformError::Spawn)?;
        Ok(Self::new(program, args))
    }

    /// Program path.
    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Arguments.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Starts the process. The returned thread waits for it to exit, so the
    /// child is reaped even though nobody joins the handle.
    pub fn launch(&self) -> Result<JoinHandle<Option<ExitStatus>>, PlatformError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(PlatformError::Spawn)?;
        info!(pid = child.id(), program = %self.program.display(), "Duplicate window launched");
        reap(child)
    }
}

fn reap(mut child: Child) -> Result<JoinHandle<Option<ExitStatus>>, PlatformError> {
    let pid = child.id();
    thread::Builder::new()
        .name(format!("softlight-reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => {
                debug!(pid, %status, "Duplicate window exited");
                Some(status)
            }
            Err(e) => {
                warn!(pid, error = %e, "Lost track of duplicate window");
                None
            }
        })
        .map_err(PlatformError::Spawn)
}

impl WindowOpener for DuplicateCommand {
    fn open_duplicate(&self) -> Result<(), PlatformError> {
        self.launch().map(drop)
    }
}

/// Opener for hosts that cannot launch windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDuplicate;

impl WindowOpener for NoDuplicate {
    fn open_duplicate(&self) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("duplicate window"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_fails_to_spawn() {
        let cmd = DuplicateCommand::new("/nonexistent/softlight-test-binary", ["run"]);
        let err = cmd.open_duplicate().unwrap_err();
        assert!(matches!(err, PlatformError::Spawn(_)));
    }

    #[cfg(unix)]
    #[test]
    fn launched_process_is_reaped() {
        let cmd = DuplicateCommand::new("true", std::iter::empty::<OsString>());
        let status = cmd.launch().unwrap().join().unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }

    #[test]
    fn current_exe_keeps_args() {
        let cmd = DuplicateCommand::current_exe(["run", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cmd.program().is_absolute());
        assert_eq!(cmd.args().len(), 3);
        assert_eq!(cmd.args()[0], "run");
    }

    #[test]
    fn no_duplicate_is_unsupported() {
        assert!(matches!(
            NoDuplicate.open_duplicate(),
            Err(PlatformError::Unsupported(_))
        ));
    }
}
