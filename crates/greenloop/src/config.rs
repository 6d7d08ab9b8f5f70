use crate::error::GameError;
use std::time::Duration;

/// Configuration for the minigame sessions.
///
/// Defaults reproduce the shipped game rules; hosts override fields for
/// shorter rounds in demos or tests.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Maximum questions per quiz round (the round is smaller when the
    /// filtered pool is smaller). Default: 10.
    pub quiz_round_cap: usize,
    /// Countdown per quiz question in seconds. Default: 30.
    pub quiz_question_secs: u64,
    /// Maximum items per sorting round. Default: 5.
    pub sorting_round_cap: usize,
    /// Pause between a sorting answer and the next item, during which the
    /// feedback message is shown. Default: 2s.
    pub sorting_feedback_pause: Duration,
    /// Base count for the memory board: a round at difficulty `L` deals
    /// `base + L` pairs, capped at `memory_max_pairs`. Default: 4.
    pub memory_base_pairs: usize,
    /// Hard cap on memory pairs. Default: 12.
    pub memory_max_pairs: usize,
    /// Base memory countdown: a round at difficulty `L` gets
    /// `base + per_level * L` seconds. Default: 60.
    pub memory_base_secs: u64,
    /// Extra countdown seconds per difficulty level. Default: 5.
    pub memory_secs_per_level: u64,
    /// Delay before a matched pair locks in place. Default: 500ms.
    pub memory_match_confirm: Duration,
    /// Delay before a mismatched pair flips face down again. Default: 1s.
    pub memory_mismatch_reset: Duration,
}

impl GameConfig {
    /// Validate configuration values.
    ///
    /// Checks:
    /// - round caps and pair counts are `>= 1`
    /// - `memory_max_pairs > memory_base_pairs`
    /// - countdowns are non-zero
    pub fn validate(&self) -> Result<(), GameError> {
        if self.quiz_round_cap == 0 {
            return Err(GameError::InvalidConfig {
                reason: "quiz_round_cap must be >= 1".to_string(),
            });
        }
        if self.quiz_question_secs == 0 {
            return Err(GameError::InvalidConfig {
                reason: "quiz_question_secs must be > 0".to_string(),
            });
        }
        if self.sorting_round_cap == 0 {
            return Err(GameError::InvalidConfig {
                reason: "sorting_round_cap must be >= 1".to_string(),
            });
        }
        if self.memory_base_pairs == 0 {
            return Err(GameError::InvalidConfig {
                reason: "memory_base_pairs must be >= 1".to_string(),
            });
        }
        if self.memory_max_pairs <= self.memory_base_pairs {
            return Err(GameError::InvalidConfig {
                reason: format!(
                    "memory_max_pairs must be > memory_base_pairs, got {} <= {}",
                    self.memory_max_pairs, self.memory_base_pairs
                ),
            });
        }
        if self.memory_base_secs == 0 {
            return Err(GameError::InvalidConfig {
                reason: "memory_base_secs must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            quiz_round_cap: 10,
            quiz_question_secs: 30,
            sorting_round_cap: 5,
            sorting_feedback_pause: Duration::from_secs(2),
            memory_base_pairs: 4,
            memory_max_pairs: 12,
            memory_base_secs: 60,
            memory_secs_per_level: 5,
            memory_match_confirm: Duration::from_millis(500),
            memory_mismatch_reset: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = GameConfig::default();
        assert_eq!(config.quiz_round_cap, 10);
        assert_eq!(config.quiz_question_secs, 30);
        assert_eq!(config.sorting_round_cap, 5);
        assert_eq!(config.sorting_feedback_pause, Duration::from_secs(2));
        assert_eq!(config.memory_base_pairs, 4);
        assert_eq!(config.memory_max_pairs, 12);
        assert_eq!(config.memory_base_secs, 60);
        assert_eq!(config.memory_secs_per_level, 5);
        assert_eq!(config.memory_match_confirm, Duration::from_millis(500));
        assert_eq!(config.memory_mismatch_reset, Duration::from_secs(1));
    }

    #[test]
    fn default_config_is_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn custom_config() {
        let config = GameConfig {
            quiz_round_cap: 3,
            ..Default::default()
        };
        assert_eq!(config.quiz_round_cap, 3);
        // Other fields keep defaults
        assert_eq!(config.sorting_round_cap, 5);
    }

    #[test]
    fn validate_zero_quiz_round_cap() {
        let config = GameConfig {
            quiz_round_cap: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("quiz_round_cap"), "got: {msg}");
    }

    #[test]
    fn validate_zero_question_secs() {
        let config = GameConfig {
            quiz_question_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("quiz_question_secs"), "got: {msg}");
    }

    #[test]
    fn validate_pair_bounds() {
        let config = GameConfig {
            memory_base_pairs: 12,
            memory_max_pairs: 12,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("memory_max_pairs"), "got: {msg}");
    }
}
