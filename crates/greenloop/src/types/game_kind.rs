use serde::{Deserialize, Serialize};
use std::fmt;

/// The minigame a session or persisted record belongs to.
///
/// Serialized as the lowercase name, which is also the segment used in
/// storage keys (`move:{player}:{game}:{level}:{id}`).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Quiz,
    Sorting,
    Memory,
}

impl GameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Quiz => "quiz",
            GameKind::Sorting => "sorting",
            GameKind::Memory => "memory",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
