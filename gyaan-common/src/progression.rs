//! Progression math: leveling, rage meter, time bonus
//!
//! Pure functions layered on top of the persisted account fields. The
//! session store applies these after every XP mutation; nothing here
//! touches the database.

use serde::{Deserialize, Serialize};

/// XP required per level
pub const XP_PER_LEVEL: i64 = 200;

/// Default rage meter threshold (teacher-editable via reward config)
pub const DEFAULT_RAGE_THRESHOLD: i64 = 500;

/// Fixed baseline for math problems, in seconds
pub const MATH_BASELINE_SECS: f64 = 30.0;

/// Per-word reading baseline, in seconds
pub const READING_SECS_PER_WORD: f64 = 0.5;

/// Time bonus multiplier applied to seconds under baseline
const TIME_BONUS_FACTOR: f64 = 2.0;

/// Level implied by an XP total: `xp / 200 + 1`.
///
/// Deterministic, total, monotonic in `xp`. Note that a freshly signed-up
/// account holds level 0 until its first evaluation; the floor of this
/// function is only reached once XP has been granted at least once.
pub fn level_for_xp(xp: i64) -> i64 {
    xp / XP_PER_LEVEL + 1
}

/// Rage meter: a second XP counter bounded by a teacher-set threshold.
///
/// Every grant accumulates into `progress`; when the running total meets
/// or exceeds `threshold` the meter wraps via modulo and reports a
/// one-shot reward-ready signal for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RageMeter {
    pub progress: i64,
    pub threshold: i64,
}

impl RageMeter {
    pub fn new(threshold: i64) -> Self {
        Self { progress: 0, threshold }
    }

    /// Accumulate an XP grant. Returns true when the meter filled and a
    /// reward became claimable; `progress` has already wrapped when it does.
    pub fn advance(&mut self, amount: i64) -> bool {
        let total = self.progress + amount;
        if total >= self.threshold {
            self.progress = total % self.threshold;
            true
        } else {
            self.progress = total;
            false
        }
    }
}

impl Default for RageMeter {
    fn default() -> Self {
        Self::new(DEFAULT_RAGE_THRESHOLD)
    }
}

/// Bonus XP for finishing a timed exercise under its baseline duration.
///
/// `max(0, (baseline - elapsed) * 2)`, floored to an integer. Slower than
/// baseline always yields zero, never a penalty.
pub fn time_bonus(elapsed_secs: f64, baseline_secs: f64) -> i64 {
    if elapsed_secs < baseline_secs {
        ((baseline_secs - elapsed_secs) * TIME_BONUS_FACTOR).floor() as i64
    } else {
        0
    }
}

/// Baseline duration for a reading passage, scaled by word count
pub fn reading_baseline_secs(word_count: usize) -> f64 {
    word_count as f64 * READING_SECS_PER_WORD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leveling_table() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(199), 1);
        assert_eq!(level_for_xp(200), 2);
        assert_eq!(level_for_xp(399), 2);
        assert_eq!(level_for_xp(400), 3);
    }

    #[test]
    fn leveling_is_monotonic() {
        let mut last = level_for_xp(0);
        for xp in 1..2000 {
            let level = level_for_xp(xp);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn rage_meter_accumulates_below_threshold() {
        let mut meter = RageMeter::new(500);
        assert!(!meter.advance(100));
        assert!(!meter.advance(399));
        assert_eq!(meter.progress, 499);
    }

    #[test]
    fn rage_meter_wraps_via_modulo() {
        let mut meter = RageMeter { progress: 480, threshold: 500 };
        assert!(meter.advance(40));
        assert_eq!(meter.progress, 20);
    }

    #[test]
    fn rage_meter_signals_once_per_fill_cycle() {
        let mut meter = RageMeter::new(500);
        assert!(meter.advance(500));
        assert_eq!(meter.progress, 0);
        // Next grant starts a fresh cycle, no second signal
        assert!(!meter.advance(100));
    }

    #[test]
    fn rage_meter_exact_threshold_counts_as_fill() {
        let mut meter = RageMeter { progress: 460, threshold: 500 };
        assert!(meter.advance(40));
        assert_eq!(meter.progress, 0);
    }

    #[test]
    fn time_bonus_under_baseline() {
        assert_eq!(time_bonus(20.0, 30.0), 20);
        assert_eq!(time_bonus(29.5, 30.0), 1);
    }

    #[test]
    fn time_bonus_never_negative() {
        assert_eq!(time_bonus(30.0, 30.0), 0);
        assert_eq!(time_bonus(45.0, 30.0), 0);
    }

    #[test]
    fn reading_baseline_scales_with_word_count() {
        assert_eq!(reading_baseline_secs(9), 4.5);
        assert_eq!(time_bonus(2.5, reading_baseline_secs(9)), 4);
    }
}
