use crate::types::{Difficulty, GameKind, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one (player, game, difficulty) session scope.
///
/// Every pending-move buffer belongs to exactly one `SessionKey`, and the
/// key supplies the segments of the persisted record keys.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionKey {
    pub player: PlayerId,
    pub game: GameKind,
    pub difficulty: Difficulty,
}

impl SessionKey {
    pub fn new(player: PlayerId, game: GameKind, difficulty: Difficulty) -> Self {
        Self {
            player,
            game,
            difficulty,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.player, self.game, self.difficulty)
    }
}
