//! Goal recommendation and pacing.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Baseline intake per kilogram of body weight, in ml.
pub const ML_PER_KG: f64 = 30.0;

/// Length of the waking window used for hourly pacing.
pub const WAKING_HOURS: u32 = 16;

/// How active the user is on a typical day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Light,
    #[default]
    Moderate,
    Intense,
}

impl ActivityLevel {
    /// Extra ml/day on top of the weight-based baseline.
    #[must_use]
    pub const fn bonus_ml(self) -> u32 {
        match self {
            Self::Light => 0,
            Self::Moderate => 200,
            Self::Intense => 500,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Intense => "intense",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "intense" => Ok(Self::Intense),
            _ => Err(ValidationError::InvalidActivityLevel {
                value: s.to_string(),
            }),
        }
    }
}

/// Recommended daily intake in ml: `weight * 30 + activity bonus`, rounded.
///
/// No range checks are applied. Results below zero saturate to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn recommended_intake(body_weight_kg: f64, activity_level: ActivityLevel) -> u32 {
    body_weight_kg
        .mul_add(ML_PER_KG, f64::from(activity_level.bonus_ml()))
        .round() as u32
}

/// Even hourly share of `daily_goal` over a 16 hour waking window.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hourly_recommendation(daily_goal: u32) -> u32 {
    (f64::from(daily_goal) / f64::from(WAKING_HOURS)).round() as u32
}

/// Amount per hour still needed to reach `goal_amount`.
///
/// `hours_left` below 1 is treated as 1. Returns 0 once the goal is met.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn remaining_per_hour(current_amount: u64, goal_amount: u32, hours_left: i64) -> u64 {
    let remaining = i128::from(goal_amount) - i128::from(current_amount);
    if remaining <= 0 {
        return 0;
    }
    let hours = hours_left.max(1);
    (remaining as f64 / hours as f64).round() as u64
}

/// Whole hours from `now` until `wake_end_hour:00`, never negative.
pub fn hours_left_in_day(now: NaiveTime, wake_end_hour: u32) -> i64 {
    let end_minutes = i64::from(wake_end_hour.min(24)) * 60;
    let now_minutes = i64::from(now.hour()) * 60 + i64::from(now.minute());
    ((end_minutes - now_minutes) / 60).max(0)
}
