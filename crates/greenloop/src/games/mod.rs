//! Minigame session controllers.
//!
//! Each controller wraps a [`crate::session::SessionCore`] and exposes the
//! game's events as methods. Methods that can end the round are async
//! because the over-transition flushes the move buffer.

pub mod memory;
pub mod quiz;
pub mod sorting;

pub use memory::{FlipOutcome, MemoryCard, MemorySession};
pub use quiz::{AnswerOutcome, QuizQuestion, QuizSession};
pub use sorting::{BinColor, SortOutcome, SortingSession, WasteItem};

use rand::seq::SliceRandom;
use rand::Rng;

/// Unbiased in-place shuffle (Fisher-Yates).
pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut rand::thread_rng());
}

/// Shuffle with a caller-supplied generator, for deterministic rounds.
pub fn shuffle_with<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Deal a round: shuffle the pool and keep at most `cap` entries.
pub(crate) fn deal<T>(mut pool: Vec<T>, cap: usize) -> Vec<T> {
    shuffle(&mut pool);
    pool.truncate(cap);
    pool
}
