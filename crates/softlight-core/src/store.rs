//! State store: load-or-default, mutate, persist.
//!
//! The store is constructed once per session and owns both the
//! [`ApplicationState`] and the [`Storage`] it is mirrored to. Every change
//! goes through [`StateStore::apply`], which rewrites the whole record.
//!
//! Reads never fail from the caller's point of view: an absent, unreadable or
//! malformed record yields [`ApplicationState::initial`]. Writes are
//! last-write-wins with no versioning.

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::state::ApplicationState;
use crate::storage::{STORAGE_KEY, Storage};

/// Owner of the application state and its persisted copy.
#[derive(Debug)]
pub struct StateStore<S> {
    storage: S,
    state: ApplicationState,
}

impl<S: Storage> StateStore<S> {
    /// Loads the persisted state from `storage`, or the initial state.
    pub fn load(storage: S) -> Self {
        let state = Self::read_state(&storage);
        Self { storage, state }
    }

    /// Reads the persisted record without taking ownership of the storage.
    pub fn read_state(storage: &S) -> ApplicationState {
        trace!("StateStore::read_state");
        match storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(state) => {
                    debug!("Loaded stored state");
                    state
                }
                Err(e) => {
                    warn!(error = %e, "Stored state is invalid, using defaults");
                    ApplicationState::initial()
                }
            },
            Ok(None) => {
                debug!("No stored state, using defaults");
                ApplicationState::initial()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored state, using defaults");
                ApplicationState::initial()
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Writes the full state, logging failures.
    pub fn save(&mut self) {
        if let Err(e) = self.try_save() {
            warn!(error = %e, "Failed to persist state");
        }
    }

    /// Writes the full state.
    pub fn try_save(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.state)?;
        self.storage.write(STORAGE_KEY, &raw)?;
        trace!(bytes = raw.len(), "State persisted");
        Ok(())
    }

    /// Applies `mutator` to the state and persists the result.
    pub fn apply<F>(&mut self, mutator: F) -> &ApplicationState
    where
        F: FnOnce(&mut ApplicationState),
    {
        mutator(&mut self.state);
        self.save();
        &self.state
    }

    /// Like [`apply`](Self::apply) but reports write failures.
    pub fn try_apply<F>(&mut self, mutator: F) -> Result<&ApplicationState>
    where
        F: FnOnce(&mut ApplicationState),
    {
        mutator(&mut self.state);
        self.try_save()?;
        Ok(&self.state)
    }

    /// Deletes the persisted record and reverts to the initial state.
    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove(STORAGE_KEY)?;
        self.state = ApplicationState::initial();
        debug!("State reset");
        Ok(())
    }
}
