//! AppCore — central dispatcher for the playback core.
//!
//! Unified interface over the catalog, the persisted stores, and session
//! creation. The CLI and the headless integration tests both go through
//! AppCore, so every user-facing operation stays exercisable without a UI.

use crate::catalog::{Catalog, VideoMeta};
use crate::debt::{DebtQueue, MAX_DEBT};
use crate::error::Result;
use crate::mode::{AdMode, ModeStore};
use crate::session::PlaybackSession;
use crate::store::{MemoryStorage, StoreHandle};
use std::rc::Rc;

pub struct AppCore {
    pub catalog: Catalog,
    pub mode: ModeStore,
    pub debt: DebtQueue,
}

impl AppCore {
    /// Build an AppCore over an injected storage backend.
    pub fn new(store: StoreHandle, catalog: Catalog) -> Self {
        AppCore {
            catalog,
            mode: ModeStore::load(Rc::clone(&store)),
            debt: DebtQueue::load(store),
        }
    }

    /// Memory-backed AppCore with the builtin catalog, for tests and
    /// ephemeral runs.
    pub fn new_test() -> Self {
        AppCore::new(Rc::new(MemoryStorage::new()), Catalog::builtin())
    }

    pub fn videos(&self) -> &[VideoMeta] {
        self.catalog.all()
    }

    pub fn video(&self, id: &str) -> Result<&VideoMeta> {
        self.catalog.by_id(id)
    }

    pub fn mode(&self) -> AdMode {
        self.mode.mode()
    }

    pub fn set_mode(&mut self, mode: AdMode) {
        self.mode.set_mode(mode);
    }

    /// `(owed, capacity)` for the debt indicator.
    pub fn debt_summary(&self) -> (usize, usize) {
        (self.debt.len(), MAX_DEBT)
    }

    /// Start a playback session for a video under the current mode.
    ///
    /// The caller issues `session.initial_load()` to the player and then
    /// feeds status updates back through the session.
    pub fn open_session(&self, video_id: &str) -> Result<PlaybackSession> {
        let video = self.catalog.by_id(video_id)?;
        Ok(PlaybackSession::new(video, self.mode()))
    }

    /// The entry-screen reset: forgive all debt. The mode keeps its value
    /// until the user picks again via `set_mode`.
    pub fn reset(&mut self) {
        self.debt.clear();
    }
}
