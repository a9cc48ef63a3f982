//! Experience accounting and leveling curve.
//!
//! # Responsibility
//! - Convert a lifetime experience total into level state.
//! - Provide the fixed experience value per task difficulty.
//!
//! # Invariants
//! - Advancing from level `L` to `L + 1` costs `100 + 25 * (L - 1)` XP.
//! - `progress < next` for every level up to `LEVEL_CEILING`.
//! - Negative totals are clamped to zero, never rejected.

use crate::model::task::Difficulty;

/// Level at which the leveling loop stops consuming experience.
///
/// Reaching it is a silent cap: the loop stops once the level moves past
/// this value, and any leftover experience stays in `progress`.
pub const LEVEL_CEILING: u32 = 200;

const BASE_THRESHOLD: u64 = 100;
const THRESHOLD_STEP: u64 = 25;

/// Derived progression state for one experience total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelState {
    /// Current level, starting at 1.
    pub level: u32,
    /// Unconsumed experience inside the current level.
    pub progress: u64,
    /// Experience needed to go from `level` to `level + 1`.
    pub next: u64,
}

impl LevelState {
    /// Rounded completion percentage of the current level.
    ///
    /// Clamped to `0..=100`; capped states past the ceiling report 100.
    pub fn progress_percent(&self) -> u8 {
        if self.progress >= self.next {
            return 100;
        }
        let percent = (u128::from(self.progress) * 100 + u128::from(self.next) / 2)
            / u128::from(self.next);
        percent.min(100) as u8
    }
}

/// Returns the fixed experience value for a task difficulty.
pub fn xp_for_difficulty(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Medium => 20,
        Difficulty::Hard => 35,
    }
}

/// Returns the experience required to advance from `level` to `level + 1`.
///
/// Level `0` is treated like level `1`.
pub fn xp_to_next_level(level: u32) -> u64 {
    BASE_THRESHOLD + THRESHOLD_STEP * u64::from(level.saturating_sub(1))
}

/// Computes level state from a lifetime experience total.
///
/// Pure and total: identical inputs always produce identical outputs.
pub fn level_from_total(total_xp: i64) -> LevelState {
    let mut level = 1u32;
    let mut remaining = total_xp.max(0) as u64;

    while remaining >= xp_to_next_level(level) {
        remaining -= xp_to_next_level(level);
        level += 1;
        if level > LEVEL_CEILING {
            break;
        }
    }

    LevelState {
        level,
        progress: remaining,
        next: xp_to_next_level(level),
    }
}

/// Returns the cumulative experience at which `level` is first reached.
///
/// Inverse of [`level_from_total`]: `cumulative_xp_for_level(s.level) +
/// s.progress` reproduces the input total.
pub fn cumulative_xp_for_level(level: u32) -> u64 {
    let completed_levels = u64::from(level.saturating_sub(1));
    // Arithmetic series over thresholds of levels 1..level-1.
    BASE_THRESHOLD * completed_levels
        + THRESHOLD_STEP * completed_levels * completed_levels.saturating_sub(1) / 2
}
