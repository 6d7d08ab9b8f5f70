mod difficulty;
mod family_token;
mod game_kind;
mod player_id;
mod session_key;

pub use difficulty::{Difficulty, DifficultyError, DifficultyLabel, MAX_DIFFICULTY, MIN_DIFFICULTY};
pub use family_token::FamilyToken;
pub use game_kind::GameKind;
pub use player_id::PlayerId;
pub use session_key::SessionKey;
