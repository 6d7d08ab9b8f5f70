//! Pass/fail rules shared by every minigame.

/// Minimum percentage of correct resolutions required to unlock the next
/// difficulty level.
pub const PASS_THRESHOLD: f64 = 90.0;

/// Percentage of correct resolutions, `0.0` when nothing was attempted.
pub fn percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (correct as f64 / total as f64) * 100.0
}

/// Whether the round clears the pass threshold.
pub fn has_passed(correct: u32, total: u32) -> bool {
    percentage(correct, total) >= PASS_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_nothing_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn percentage_is_exact() {
        assert_eq!(percentage(9, 10), 90.0);
        assert_eq!(percentage(8, 10), 80.0);
        assert_eq!(percentage(5, 5), 100.0);
        assert_eq!(percentage(1, 3), 100.0 / 3.0);
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        assert!(has_passed(9, 10));
        assert!(has_passed(10, 10));
        assert!(!has_passed(8, 10));
    }

    #[test]
    fn empty_round_never_passes() {
        assert!(!has_passed(0, 0));
    }
}
