//! Buffering of scored actions during a round.
//!
//! Every resolved player action becomes a [`Move`] the instant it resolves
//! and is appended to the session's [`PendingMoves`]. Nothing is persisted
//! until the round's single game-over flush drains the buffer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One resolved player action, buffered until the game-over flush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// Whether the action was correct.
    pub correct: bool,
    /// Seconds between the prompt being presented and the action resolving.
    pub response_time_secs: u32,
    /// Points awarded: 0 when incorrect, the fixed per-game reward otherwise.
    pub points: u32,
    /// Game-specific context (question id, chosen option, selected bin, ...).
    pub extra: Map<String, Value>,
}

impl Move {
    pub fn new(correct: bool, response_time_secs: u32, points: u32) -> Self {
        Self {
            correct,
            response_time_secs,
            points,
            extra: Map::new(),
        }
    }

    /// Attach game-specific context.
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }
}

/// Ordered append-only buffer of the current round's moves.
///
/// Owned exclusively by one session controller; created empty at round
/// start, drained once by the game-over flush, or discarded by a restart.
#[derive(Debug, Default)]
pub struct PendingMoves {
    moves: Vec<Move>,
}

impl PendingMoves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move. Never rejected; order is resolution order.
    pub fn append(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Discard everything without persisting (restart, difficulty change).
    pub fn reset(&mut self) {
        self.moves.clear();
    }

    /// Drain all buffered moves in append order, leaving the buffer empty.
    pub fn take_all(&mut self) -> Vec<Move> {
        std::mem::take(&mut self.moves)
    }
}
