use std::collections::VecDeque;

use crate::state::game::MatchState;

/// Number of snapshots kept by default.
pub const DEFAULT_UNDO_CAPACITY: usize = 50;

/// Immutable copy of the match state taken before a mutation.
///
/// The snapshot owns its data (lineup, serve history) so later changes to the
/// live state can never leak into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStateSnapshot(MatchState);

impl GameStateSnapshot {
    /// Deep-copy the live state.
    pub fn capture(state: &MatchState) -> Self {
        Self(state.clone())
    }

    /// Borrow the captured state.
    pub fn state(&self) -> &MatchState {
        &self.0
    }

    /// Consume the snapshot, returning the captured state.
    pub fn into_state(self) -> MatchState {
        self.0
    }
}

/// Bounded LIFO of snapshots; the oldest entry is evicted when full.
#[derive(Debug, Clone)]
pub struct UndoLog {
    entries: VecDeque<GameStateSnapshot>,
    capacity: usize,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_UNDO_CAPACITY)
    }
}

impl UndoLog {
    /// Create a log keeping at most `capacity` snapshots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a snapshot, evicting the oldest one when the log is full.
    pub fn push(&mut self, snapshot: GameStateSnapshot) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<GameStateSnapshot> {
        self.entries.pop_back()
    }

    /// Number of snapshots currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
