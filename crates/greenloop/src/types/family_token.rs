use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared token that groups player profiles into one family account.
/// The host persists it across reloads; the core only validates it on resume.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FamilyToken(pub String);

impl FamilyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Display for FamilyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FamilyToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
