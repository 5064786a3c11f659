//! Worker thread handler for blocking host operations.
//!
//! Device enumeration, opening a camera and spawning a process may all
//! block; they run here so the window keeps repainting.

use std::sync::mpsc::{Receiver, Sender};

use softlight_core::{CaptureConstraints, MediaDevices, Outcome, WindowOpener, has_video_input};
use tracing::{debug, trace, warn};

use crate::messages::{HostEvent, HostMsg};

/// Worker thread handler.
pub struct HostHandler<M, W> {
    rx: Receiver<HostMsg>,
    tx: Sender<HostEvent>,
    media: M,
    window: W,
}

impl<M: MediaDevices, W: WindowOpener> HostHandler<M, W> {
    /// Creates a new handler.
    pub fn new(rx: Receiver<HostMsg>, tx: Sender<HostEvent>, media: M, window: W) -> Self {
        Self {
            rx,
            tx,
            media,
            window,
        }
    }

    /// Main event loop. Returns when [`HostMsg::Close`] arrives or the UI
    /// side hangs up.
    pub fn run(self) {
        while let Ok(msg) = self.rx.recv() {
            trace!(?msg, "HostHandler::run");
            match msg {
                HostMsg::Close => break,
                HostMsg::ProbeCamera => self.probe_camera(),
                HostMsg::AcquireCamera(constraints) => self.acquire_camera(&constraints),
                HostMsg::OpenDuplicate => self.open_duplicate(),
            }
        }

        debug!("Host handler shutdown");
    }

    fn send(&self, event: HostEvent) {
        let _ = self.tx.send(event);
    }

    fn probe_camera(&self) {
        self.send(HostEvent::CameraProbed(has_video_input(&self.media)));
    }

    fn acquire_camera(&self, constraints: &CaptureConstraints) {
        let outcome = Outcome::from(self.media.open(constraints));
        // A stream the UI no longer receives is dropped here, which stops it.
        self.send(HostEvent::CameraResolved(outcome));
    }

    fn open_duplicate(&self) {
        if let Err(e) = self.window.open_duplicate() {
            warn!(error = %e, "Duplicate window failed");
            self.send(HostEvent::DuplicateFailed(e.to_string()));
        }
    }
}
