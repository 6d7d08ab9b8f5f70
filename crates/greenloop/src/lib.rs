//! Session core for the GreenLoop family recycling games.
//!
//! Players pick a minigame (quiz, waste sorting, icon memory), play a round
//! at their difficulty, and every resolved action becomes a buffered
//! [`moves::Move`]. When the round ends the buffer is flushed exactly once,
//! as one batched write, through the host-provided [`gateway::KvGateway`].
//! The crate also carries the family shell (login, member switching,
//! session restore), the standings board, and a cancellable scheduler for
//! the games' timers and feedback delays.
//!
//! ```
//! use greenloop::prelude::*;
//! use greenloop::storage::MemoryKvStore;
//! use greenloop::testing::quiz_pool;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), GameError> {
//! let gateway = Arc::new(MemoryKvStore::new());
//! let config = Arc::new(GameConfig::default());
//! let difficulty = Difficulty::validated(5)?;
//! let ctx = SessionContext::new(
//!     PlayerId::new("p-1"),
//!     FamilyToken::new("fam-1"),
//!     difficulty,
//! );
//!
//! let mut quiz = QuizSession::new(&ctx, gateway, config, quiz_pool(difficulty, 10))?;
//! quiz.begin()?;
//! let outcome = quiz.answer(Some(0))?;
//! let summary = quiz.advance().await?;
//! # let _ = (outcome, summary);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod games;
pub mod gateway;
pub mod moves;
pub mod profile;
pub mod ranking;
pub mod records;
pub mod schedule;
pub mod scoring;
pub mod session;
pub mod shell;
pub mod storage;
pub mod testing;
pub mod types;

/// Prelude module for convenient glob imports.
///
/// Re-exports the types a host needs to run sessions: the controllers, the
/// shared session contract, the gateway trait, and the id newtypes.
pub mod prelude {
    pub use crate::config::GameConfig;
    pub use crate::error::GameError;
    pub use crate::games::{MemorySession, QuizSession, SortingSession};
    pub use crate::gateway::KvGateway;
    pub use crate::schedule::TaskScheduler;
    pub use crate::session::{GamePhase, RoundSummary, SessionContext, Verdict};
    pub use crate::shell::FamilyShell;
    pub use crate::types::{Difficulty, FamilyToken, GameKind, PlayerId, SessionKey};
}
