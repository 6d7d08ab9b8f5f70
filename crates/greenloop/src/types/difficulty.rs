use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest selectable difficulty.
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest selectable difficulty.
pub const MAX_DIFFICULTY: u8 = 10;

/// Player-selected difficulty level, always within 1-10.
///
/// The level controls content filtering, the memory board size and the
/// memory countdown. Use [`Difficulty::validated`] for validated construction.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// Get the inner level value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Create a new `Difficulty` with validation.
    ///
    /// Returns `Err` if the value is outside the valid range `1..=10`.
    pub fn validated(level: u8) -> Result<Self, DifficultyError> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&level) {
            Err(DifficultyError { value: level })
        } else {
            Ok(Self(level))
        }
    }

    /// Create a new `Difficulty` by clamping the value into the valid range.
    ///
    /// Useful for level progression where advancing past the highest level
    /// stays at the highest level.
    pub fn clamped(level: u8) -> Self {
        Self(level.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY))
    }

    /// The level unlocked by passing this one. Saturates at the maximum.
    pub fn next(self) -> Self {
        Self::clamped(self.0.saturating_add(1))
    }

    /// Coarse display tier: 1-3 easy, 4-7 medium, 8-10 hard.
    pub fn label(self) -> DifficultyLabel {
        match self.0 {
            MIN_DIFFICULTY..=3 => DifficultyLabel::Easy,
            4..=7 => DifficultyLabel::Medium,
            _ => DifficultyLabel::Hard,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DifficultyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::validated(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a difficulty level is outside the valid range 1-10.
#[derive(Debug, Clone, thiserror::Error)]
#[error("difficulty {value} is out of range (valid: 1..=10)")]
pub struct DifficultyError {
    pub value: u8,
}

/// Human-facing difficulty tier derived from the numeric level.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLabel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLabel::Easy => "easy",
            DifficultyLabel::Medium => "medium",
            DifficultyLabel::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_accepts_valid_range() {
        assert!(Difficulty::validated(1).is_ok());
        assert!(Difficulty::validated(5).is_ok());
        assert!(Difficulty::validated(10).is_ok());
    }

    #[test]
    fn validated_rejects_out_of_range() {
        assert!(Difficulty::validated(0).is_err());
        assert!(Difficulty::validated(11).is_err());
        assert!(Difficulty::validated(u8::MAX).is_err());
    }

    #[test]
    fn clamped_stays_in_range() {
        assert_eq!(Difficulty::clamped(0).value(), 1);
        assert_eq!(Difficulty::clamped(5).value(), 5);
        assert_eq!(Difficulty::clamped(200).value(), 10);
    }

    #[test]
    fn next_saturates_at_maximum() {
        assert_eq!(Difficulty::validated(3).unwrap().next().value(), 4);
        assert_eq!(Difficulty::validated(10).unwrap().next().value(), 10);
    }

    #[test]
    fn label_tiers() {
        assert_eq!(Difficulty::validated(1).unwrap().label(), DifficultyLabel::Easy);
        assert_eq!(Difficulty::validated(3).unwrap().label(), DifficultyLabel::Easy);
        assert_eq!(Difficulty::validated(4).unwrap().label(), DifficultyLabel::Medium);
        assert_eq!(Difficulty::validated(7).unwrap().label(), DifficultyLabel::Medium);
        assert_eq!(Difficulty::validated(8).unwrap().label(), DifficultyLabel::Hard);
        assert_eq!(Difficulty::validated(10).unwrap().label(), DifficultyLabel::Hard);
    }

    #[test]
    fn serde_rejects_out_of_range() {
        let result: Result<Difficulty, _> = serde_json::from_str("0");
        assert!(result.is_err());
        let result: Result<Difficulty, _> = serde_json::from_str("11");
        assert!(result.is_err());
    }

    #[test]
    fn error_display() {
        let err = Difficulty::validated(42).unwrap_err();
        assert_eq!(err.to_string(), "difficulty 42 is out of range (valid: 1..=10)");
    }
}
