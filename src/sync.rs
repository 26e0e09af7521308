//! Sync layer: the contracts this engine expects from its external
//! collaborators (persistence, realtime transport, share resolution) and the
//! debounced autosave machinery that drives them.
//!
//! The engine core never performs I/O. The host owns the actual adapters
//! (HTTP, WebSocket, storage) and drives [`SyncController`] from its event
//! loop: `on_commit` after every history push, `on_cursor` on pointer moves,
//! `tick` from a timer. All time is supplied by the host as millisecond
//! timestamps, so the scheduling logic is a pure state machine.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::consts::{AUTOSAVE_DELAY_MS, CURSOR_THROTTLE_MS};
use crate::geom::Point;
use crate::shape::Shape;

/// Unique identifier for a board.
pub type BoardId = Uuid;

/// Access level granted for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Full mutation rights.
    #[default]
    Edit,
    /// Read-only: every mutating transition is refused; pan/zoom remain.
    View,
}

/// Tri-state save indicator observable by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// The persisted board matches the current collection.
    Saved,
    /// A save attempt is in flight.
    Saving,
    /// Edits exist that have not been persisted yet.
    Unsaved,
}

/// Failure reported by an external adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("board load failed: {0}")]
    Load(String),
    #[error("board save failed: {0}")]
    Save(String),
    #[error("share token rejected: {0}")]
    Share(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// A loaded board: its shape collection and title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardData {
    pub shapes: Vec<Shape>,
    pub title: String,
}

/// What a share token resolves to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShareGrant {
    pub board_id: BoardId,
    pub permission: Permission,
}

/// Storage collaborator. The persistence schema belongs to the adapter;
/// the core only sees shape collections.
pub trait PersistenceAdapter {
    /// Fetch a board's shapes and title.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Load`] when the board cannot be fetched.
    fn load_board(&mut self, id: BoardId) -> Result<BoardData, AdapterError>;

    /// Persist the full shape collection.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Save`] when the write fails.
    fn save_shapes(&mut self, id: BoardId, shapes: &[Shape]) -> Result<(), AdapterError>;

    /// Touch the board's last-accessed timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Save`] when the write fails.
    fn update_last_accessed(&mut self, id: BoardId) -> Result<(), AdapterError>;
}

/// Realtime transport collaborator. Broadcasts are fire-and-forget; inbound
/// snapshots reach the engine through
/// [`crate::engine::EngineCore::apply_remote`].
pub trait RealtimeAdapter {
    fn broadcast_shapes(&mut self, shapes: &[Shape]);
    fn broadcast_cursor(&mut self, cursor: Point);
}

/// Share-link collaborator: maps an opaque token to a board and permission.
pub trait ShareResolver {
    /// Resolve a share token.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Share`] for unknown or expired tokens.
    fn resolve(&self, token: &str) -> Result<ShareGrant, AdapterError>;
}

/// Debounced autosave deadline: a cancellable delayed task modeled as pure
/// state over host-supplied timestamps.
///
/// Every edit cancels and re-arms the deadline, so rapid edits coalesce into
/// one save. A failed save drops back to [`SaveState::Unsaved`] without
/// scheduling a retry — the next edit or tick re-arms the timer.
#[derive(Debug, Clone, Copy)]
pub struct AutosaveScheduler {
    deadline_ms: Option<f64>,
    state: SaveState,
}

impl AutosaveScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self { deadline_ms: None, state: SaveState::Saved }
    }

    /// Record an edit: mark unsaved and re-arm the deadline.
    pub fn mark_dirty(&mut self, now_ms: f64) {
        self.state = SaveState::Unsaved;
        self.deadline_ms = Some(now_ms + AUTOSAVE_DELAY_MS);
    }

    /// Drop any pending deadline without touching the save state.
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    /// Whether the deadline has elapsed.
    #[must_use]
    pub fn due(&self, now_ms: f64) -> bool {
        self.deadline_ms.is_some_and(|d| now_ms >= d)
    }

    /// Transition into a save attempt, consuming the deadline.
    pub fn begin_save(&mut self) {
        self.deadline_ms = None;
        self.state = SaveState::Saving;
    }

    /// Record the outcome of a save attempt. An edit that arrived while the
    /// save was in flight keeps the state at `Unsaved`.
    pub fn finish_save(&mut self, ok: bool) {
        if self.state == SaveState::Saving {
            self.state = if ok { SaveState::Saved } else { SaveState::Unsaved };
        }
    }

    #[must_use]
    pub fn state(&self) -> SaveState {
        self.state
    }
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Glue between the engine's commit stream and the external adapters:
/// broadcasts committed snapshots, debounces persistence, throttles cursor
/// broadcasts, and handles board switching.
pub struct SyncController<P, R> {
    persistence: P,
    realtime: R,
    board_id: BoardId,
    autosave: AutosaveScheduler,
    last_cursor_ms: Option<f64>,
}

impl<P: PersistenceAdapter, R: RealtimeAdapter> SyncController<P, R> {
    #[must_use]
    pub fn new(persistence: P, realtime: R, board_id: BoardId) -> Self {
        Self {
            persistence,
            realtime,
            board_id,
            autosave: AutosaveScheduler::new(),
            last_cursor_ms: None,
        }
    }

    /// Load the current board and touch its last-accessed timestamp.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's load failure; the caller leaves the board
    /// unloaded (interaction disabled) rather than corrupting history.
    pub fn open_board(&mut self) -> Result<BoardData, AdapterError> {
        let data = self.persistence.load_board(self.board_id)?;
        if let Err(err) = self.persistence.update_last_accessed(self.board_id) {
            log::warn!("failed to update last-accessed for {}: {err}", self.board_id);
        }
        Ok(data)
    }

    /// A snapshot was committed: broadcast it and re-arm the autosave.
    pub fn on_commit(&mut self, now_ms: f64, shapes: &[Shape]) {
        self.realtime.broadcast_shapes(shapes);
        self.autosave.mark_dirty(now_ms);
    }

    /// Broadcast the local cursor position, throttled.
    pub fn on_cursor(&mut self, now_ms: f64, cursor: Point) {
        let send = self
            .last_cursor_ms
            .is_none_or(|last| now_ms - last >= CURSOR_THROTTLE_MS);
        if send {
            self.last_cursor_ms = Some(now_ms);
            self.realtime.broadcast_cursor(cursor);
        }
    }

    /// Fire the autosave if its deadline has elapsed. Returns the save state
    /// after any attempt.
    pub fn tick(&mut self, now_ms: f64, shapes: &[Shape]) -> SaveState {
        if self.autosave.due(now_ms) {
            self.autosave.begin_save();
            match self.persistence.save_shapes(self.board_id, shapes) {
                Ok(()) => self.autosave.finish_save(true),
                Err(err) => {
                    log::warn!("autosave for {} failed: {err}", self.board_id);
                    self.autosave.finish_save(false);
                }
            }
        }
        self.autosave.state()
    }

    /// Switch boards: cancel the pending deadline, make one final save
    /// attempt for the old board, then load the new one.
    ///
    /// # Errors
    ///
    /// Returns the final-save or load failure; on a save failure the switch
    /// does not happen.
    pub fn switch_board(
        &mut self,
        new_id: BoardId,
        shapes: &[Shape],
    ) -> Result<BoardData, AdapterError> {
        self.autosave.cancel();
        self.persistence.save_shapes(self.board_id, shapes)?;
        self.autosave = AutosaveScheduler::new();
        self.board_id = new_id;
        self.open_board()
    }

    #[must_use]
    pub fn save_state(&self) -> SaveState {
        self.autosave.state()
    }

    #[must_use]
    pub fn board_id(&self) -> BoardId {
        self.board_id
    }
}
