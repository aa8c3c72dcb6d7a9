//! Progress display helpers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of the text progress bar, in cells.
const BAR_CELLS: usize = 10;

/// Coarse progress bucket used to pick a display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTier {
    Low,
    Medium,
    High,
    Complete,
}

impl ProgressTier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for ProgressTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Milestone reached by the day's rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Celebration {
    GoalMet,
    OneAndHalf,
    DoubleGoal,
}

impl Celebration {
    /// Label text shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::GoalMet => "Congratulations! Today's goal reached!",
            Self::OneAndHalf => "Amazing! 1.5x your goal!",
            Self::DoubleGoal => "Incredible! Double your goal!",
        }
    }
}

/// Buckets a percentage rate: 100+ complete, 67+ high, 34+ medium.
pub fn progress_tier(rate: f64) -> ProgressTier {
    if rate >= 100.0 {
        ProgressTier::Complete
    } else if rate >= 67.0 {
        ProgressTier::High
    } else if rate >= 34.0 {
        ProgressTier::Medium
    } else {
        ProgressTier::Low
    }
}

/// Percentage of `goal` reached by `current`, capped at 100.
#[allow(clippy::cast_precision_loss)]
pub fn progress_width(current: u64, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (current as f64 / f64::from(goal) * 100.0).min(100.0)
}

/// Highest milestone reached by `rate`, if any.
pub fn celebration(rate: f64) -> Option<Celebration> {
    if rate >= 200.0 {
        Some(Celebration::DoubleGoal)
    } else if rate >= 150.0 {
        Some(Celebration::OneAndHalf)
    } else if rate >= 100.0 {
        Some(Celebration::GoalMet)
    } else {
        None
    }
}

/// Ten-cell text bar for `current` out of `goal`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(current: u64, goal: u32) -> String {
    let filled = ((progress_width(current, goal) / 10.0).round() as usize).min(BAR_CELLS);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}
