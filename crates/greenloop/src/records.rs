//! Persisted play records and the game-over flush.
//!
//! Key layout:
//! - `move:{player}:{game}:{level}:{uuid}` → [`SessionRecord`] JSON
//!
//! The flush is the only writer of move records. It runs exactly once per
//! round, on the transition into [`crate::session::GamePhase::Over`], and
//! writes the whole buffer through one [`KvGateway::set_many`] call.

use crate::error::GameError;
use crate::gateway::KvGateway;
use crate::moves::Move;
use crate::types::{DifficultyLabel, GameKind, PlayerId, SessionKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

/// Key namespace for persisted move records.
pub const MOVE_KEY_PREFIX: &str = "move";

/// The persisted form of one [`Move`], written by the game-over flush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub player_id: PlayerId,
    pub game: GameKind,
    pub difficulty_level: u8,
    pub correct: bool,
    pub response_time_secs: u32,
    pub points: u32,
    pub difficulty_label: DifficultyLabel,
    #[serde(default)]
    pub extra: Map<String, Value>,
    pub recorded_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Build the persisted record for one buffered move.
    pub fn from_move(key: &SessionKey, mv: Move, recorded_at: DateTime<Utc>) -> Self {
        Self {
            player_id: key.player.clone(),
            game: key.game,
            difficulty_level: key.difficulty.value(),
            correct: mv.correct,
            response_time_secs: mv.response_time_secs,
            points: mv.points,
            difficulty_label: key.difficulty.label(),
            extra: mv.extra,
            recorded_at,
        }
    }
}

/// Key prefix under which one session's records are stored.
///
/// Ends with the separator so a scan at difficulty `1` cannot pick up
/// difficulty `10` keys.
pub fn move_prefix(key: &SessionKey) -> String {
    format!(
        "{MOVE_KEY_PREFIX}:{}:{}:{}:",
        key.player, key.game, key.difficulty
    )
}

/// Fresh storage key for one record within a session's prefix.
fn record_key(key: &SessionKey) -> String {
    format!("{}{}", move_prefix(key), Uuid::new_v4())
}

/// Persist a drained move buffer as one batched write.
///
/// An empty buffer writes nothing and returns 0. On failure the error is
/// logged and propagated; the drained moves are dropped, there is no retry.
/// Returns the number of records written.
pub async fn flush_moves(
    gateway: &dyn KvGateway,
    key: &SessionKey,
    moves: Vec<Move>,
) -> Result<usize, GameError> {
    if moves.is_empty() {
        return Ok(0);
    }

    let recorded_at = Utc::now();
    let mut entries = Vec::with_capacity(moves.len());
    for mv in moves {
        let record = SessionRecord::from_move(key, mv, recorded_at);
        let value = serde_json::to_value(&record).map_err(|e| GameError::Persistence {
            reason: format!("failed to encode session record: {e}"),
            source: Some(Box::new(e)),
        })?;
        entries.push((record_key(key), value));
    }

    let count = entries.len();
    match gateway.set_many(&entries).await {
        Ok(()) => {
            debug!(session = %key, count, "flushed session records");
            Ok(count)
        }
        Err(e) => {
            warn!(session = %key, count, error = %e, "failed to flush session records, moves dropped");
            Err(e)
        }
    }
}
