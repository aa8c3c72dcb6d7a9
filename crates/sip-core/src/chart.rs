//! Per-day chart series and history summaries.
//!
//! Unlike [`crate::aggregation`], the series here only contains days that
//! have at least one intake, and rates are rounded for display.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregation::achievement_rate;
use crate::intake::IntakeEvent;

/// One bar/point of a history chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub amount: u64,
    pub goal: u32,
    /// Rounded percentage of `goal`.
    pub achievement: u64,
}

/// Headline numbers for a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Number of recorded days in the series.
    pub total_days: usize,
    pub achieved_days: usize,
    /// Rounded mean over recorded days.
    pub average_intake: u64,
    pub max_intake: u64,
    /// Rounded share of recorded days that met the goal, in percent.
    pub achievement_rate: u64,
}

/// History window selectable by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryPeriod {
    Week,
    Month,
    All,
}

impl HistoryPeriod {
    /// Inclusive date range ending at `today`.
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            Self::Week => today.checked_sub_days(Days::new(7)),
            Self::Month => today.checked_sub_months(Months::new(1)),
            Self::All => NaiveDate::from_ymd_opt(2020, 1, 1),
        };
        (start.unwrap_or(NaiveDate::MIN), today)
    }

    /// How many of the most recent recorded days a chart shows.
    #[must_use]
    pub const fn display_days(self) -> usize {
        match self {
            Self::Week => 7,
            Self::Month | Self::All => 30,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds one point per recorded day in `[start, end]`, oldest first,
/// keeping only the most recent `limit` days.
pub fn chart_series(
    events: &[IntakeEvent],
    goal_amount: u32,
    start: NaiveDate,
    end: NaiveDate,
    limit: usize,
) -> Vec<ChartPoint> {
    let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|e| e.calendar_date >= start && e.calendar_date <= end)
    {
        *totals.entry(event.calendar_date).or_default() += u64::from(event.amount);
    }

    let skip = totals.len().saturating_sub(limit);
    totals
        .into_iter()
        .skip(skip)
        .map(|(date, amount)| ChartPoint {
            date,
            amount,
            goal: goal_amount,
            achievement: achievement_rate(amount, goal_amount),
        })
        .collect()
}

/// Summarizes a chart series.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn summarize(points: &[ChartPoint]) -> HistorySummary {
    if points.is_empty() {
        return HistorySummary::default();
    }

    let total_days = points.len();
    let total: u64 = points.iter().map(|p| p.amount).sum();
    let achieved_days = points.iter().filter(|p| p.achievement >= 100).count();
    let max_intake = points.iter().map(|p| p.amount).max().unwrap_or(0);

    HistorySummary {
        total_days,
        achieved_days,
        average_intake: (total as f64 / total_days as f64).round() as u64,
        max_intake,
        achievement_rate: (achieved_days as f64 / total_days as f64 * 100.0).round() as u64,
    }
}
