use crate::types::{Difficulty, GameKind};

/// Errors that can occur in the game core.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid input: {reason}")]
    Validation { reason: String },

    #[error("persistence error: {reason}")]
    Persistence {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("invalid session: {reason}")]
    SessionInvalid { reason: String },

    #[error("no {game} content available at difficulty {difficulty}")]
    EmptyPool {
        game: GameKind,
        difficulty: Difficulty,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    InvalidDifficulty(#[from] crate::types::DifficultyError),
}
