//! Temporal aggregation of intake events.
//!
//! Turns an unordered slice of [`IntakeEvent`]s plus a daily goal into
//! per-day, per-week and per-month statistics. Every function here is pure:
//! identical inputs always produce identical outputs.
//!
//! # Achievement rules
//!
//! Daily and weekly figures judge a day by its percentage rate
//! (`total / goal * 100 >= 100`, unrounded). Monthly figures judge a day by a
//! raw amount comparison (`total >= goal`). The two disagree when the goal is
//! zero: the rate is pinned to 0 so no day is achieved at week level, while
//! every day of the month satisfies `total >= 0`.
//!
//! # Month boundary weeks
//!
//! [`monthly_stats`] builds its weeks from the events inside the month only,
//! so days of a boundary week that fall in the neighbouring month always show
//! zero intake there.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::intake::IntakeEvent;

/// Number of days in a week window.
const WEEK_DAYS: u64 = 7;

/// Statistics for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_amount: u64,
    /// The goal in effect when these stats were computed.
    pub goal_amount: u32,
    /// Unrounded percentage of the goal; may exceed 100.
    pub achievement_rate: f64,
    pub intake_count: usize,
}

/// Statistics for a seven day window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub week_start: NaiveDate,
    /// Inclusive; always `week_start + 6 days`.
    pub week_end: NaiveDate,
    /// Total divided by 7, zero-intake days included.
    pub average_amount: f64,
    pub total_amount: u64,
    pub achieved_days: u32,
    pub daily_stats: Vec<DailyStats>,
}

/// Statistics for a calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    /// Total divided by recorded days only.
    pub average_amount: f64,
    pub total_amount: u64,
    pub achieved_days: u32,
    /// Days with a non-zero total.
    pub total_days: u32,
    pub weekly_stats: Vec<WeeklyStats>,
}

impl MonthlyStats {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            average_amount: 0.0,
            total_amount: 0,
            achieved_days: 0,
            total_days: 0,
            weekly_stats: Vec::new(),
        }
    }
}

/// Sums the amounts of the given events. No filtering is applied.
pub fn daily_total<'a>(events: impl IntoIterator<Item = &'a IntakeEvent>) -> u64 {
    events.into_iter().map(|e| u64::from(e.amount)).sum()
}

/// Computes statistics for `date` from the events attributed to it.
pub fn daily_stats(events: &[IntakeEvent], goal_amount: u32, date: NaiveDate) -> DailyStats {
    day_stats(events.iter(), goal_amount, date)
}

/// Computes statistics for the seven days starting at `week_start`.
///
/// `week_start` may be any weekday; the window is not snapped to Monday.
pub fn weekly_stats(
    events: &[IntakeEvent],
    goal_amount: u32,
    week_start: NaiveDate,
) -> WeeklyStats {
    let refs: Vec<&IntakeEvent> = events.iter().collect();
    week_stats(&refs, goal_amount, week_start)
}

/// Computes statistics for `month` (1-12) of `year`.
///
/// An invalid month yields empty statistics rather than an error.
#[allow(clippy::cast_precision_loss)]
pub fn monthly_stats(
    events: &[IntakeEvent],
    goal_amount: u32,
    year: i32,
    month: u32,
) -> MonthlyStats {
    let Some((start, end)) = month_bounds(year, month) else {
        return MonthlyStats::empty(year, month);
    };

    let month_events: Vec<&IntakeEvent> = events
        .iter()
        .filter(|e| e.calendar_date >= start && e.calendar_date <= end)
        .collect();

    let weekly_stats = month_week_starts(year, month)
        .into_iter()
        .map(|week_start| week_stats(&month_events, goal_amount, week_start))
        .collect();

    let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for event in &month_events {
        *totals.entry(event.calendar_date).or_default() += u64::from(event.amount);
    }

    let goal = u64::from(goal_amount);
    let mut total_amount = 0;
    let mut recorded_days = 0;
    let mut achieved_days = 0;
    for date in start.iter_days().take_while(|d| *d <= end) {
        let day_total = totals.get(&date).copied().unwrap_or(0);
        total_amount += day_total;
        if day_total > 0 {
            recorded_days += 1;
        }
        if day_total >= goal {
            achieved_days += 1;
        }
    }

    let average_amount = if recorded_days > 0 {
        total_amount as f64 / f64::from(recorded_days)
    } else {
        0.0
    };

    MonthlyStats {
        year,
        month,
        average_amount,
        total_amount,
        achieved_days,
        total_days: recorded_days,
        weekly_stats,
    }
}

/// Rounded percentage of `goal` reached by `total`, for display.
///
/// Returns 0 when `goal` is 0. Not capped at 100.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn achievement_rate(total: u64, goal: u32) -> u64 {
    if goal == 0 {
        return 0;
    }
    (total as f64 / f64::from(goal) * 100.0).round() as u64
}

/// First and last day of a month, or `None` if `month` is not 1-12.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}

/// Number of days in a month; 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    month_bounds(year, month).map_or(0, |(_, last)| last.day())
}

/// The Monday on or before `date`.
pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Monday-anchored week starts for every week that touches the month.
///
/// The first entry may fall in the previous month.
pub fn month_week_starts(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some((first, last)) = month_bounds(year, month) else {
        return Vec::new();
    };

    let mut starts = Vec::new();
    let mut current = monday_on_or_before(first);
    while current <= last {
        starts.push(current);
        match current.checked_add_days(Days::new(WEEK_DAYS)) {
            Some(next) => current = next,
            None => break,
        }
    }
    starts
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

#[allow(clippy::cast_precision_loss)]
fn day_stats<'a>(
    events: impl Iterator<Item = &'a IntakeEvent>,
    goal_amount: u32,
    date: NaiveDate,
) -> DailyStats {
    let day: Vec<&IntakeEvent> = events.filter(|e| e.calendar_date == date).collect();
    let total_amount = daily_total(day.iter().copied());
    let achievement_rate = if goal_amount > 0 {
        total_amount as f64 / f64::from(goal_amount) * 100.0
    } else {
        0.0
    };

    DailyStats {
        date,
        total_amount,
        goal_amount,
        achievement_rate,
        intake_count: day.len(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn week_stats(events: &[&IntakeEvent], goal_amount: u32, week_start: NaiveDate) -> WeeklyStats {
    let week_end = add_days(week_start, WEEK_DAYS - 1);
    let week_events: Vec<&IntakeEvent> = events
        .iter()
        .copied()
        .filter(|e| e.calendar_date >= week_start && e.calendar_date <= week_end)
        .collect();

    let daily_stats: Vec<DailyStats> = (0..WEEK_DAYS)
        .map(|offset| {
            let date = add_days(week_start, offset);
            day_stats(week_events.iter().copied(), goal_amount, date)
        })
        .collect();

    let total_amount: u64 = daily_stats.iter().map(|d| d.total_amount).sum();
    let achieved = daily_stats
        .iter()
        .filter(|d| d.achievement_rate >= 100.0)
        .count();
    let achieved_days = u32::try_from(achieved).unwrap_or(u32::MAX);

    WeeklyStats {
        week_start,
        week_end,
        average_amount: total_amount as f64 / WEEK_DAYS as f64,
        total_amount,
        achieved_days,
        daily_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Utc};

    use crate::types::{DrinkKind, IntakeId};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn intake(id: &str, day: &str, amount: u32) -> IntakeEvent {
        IntakeEvent::new(
            IntakeId::new(id).unwrap(),
            DateTime::<Utc>::UNIX_EPOCH,
            amount,
            DrinkKind::water(),
            date(day),
        )
    }

    #[test]
    fn test_daily_total_sums_amounts() {
        let events = vec![
            intake("a", "2024-01-01", 200),
            intake("b", "2024-01-05", 350),
            intake("c", "2024-01-01", 1000),
        ];
        assert_eq!(daily_total(&events), 1550);
        assert_eq!(daily_total(std::iter::empty()), 0);
    }

    #[test]
    fn test_daily_stats_filters_by_calendar_date() {
        let events = vec![
            intake("a", "2024-01-01", 500),
            intake("b", "2024-01-01", 1000),
            intake("c", "2024-01-02", 700),
        ];
        let stats = daily_stats(&events, 2000, date("2024-01-01"));

        assert_eq!(stats.date, date("2024-01-01"));
        assert_eq!(stats.total_amount, 1500);
        assert_eq!(stats.goal_amount, 2000);
        assert_eq!(stats.intake_count, 2);
        assert!((stats.achievement_rate - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_rate_is_unrounded() {
        let events = vec![intake("a", "2024-01-01", 1999)];
        let stats = daily_stats(&events, 2000, date("2024-01-01"));
        assert!((stats.achievement_rate - 99.95).abs() < 1e-9);
    }

    #[test]
    fn test_zero_goal_never_divides() {
        let events = vec![intake("a", "2024-01-01", 500)];
        let stats = daily_stats(&events, 0, date("2024-01-01"));
        assert!(stats.achievement_rate.abs() < f64::EPSILON);
        assert_eq!(achievement_rate(500, 0), 0);
        assert_eq!(achievement_rate(0, 0), 0);
    }

    #[test]
    fn test_achievement_rate_rounds_and_is_unbounded() {
        assert_eq!(achievement_rate(1999, 2000), 100);
        assert_eq!(achievement_rate(1000, 2000), 50);
        assert_eq!(achievement_rate(1, 3), 33);
        assert_eq!(achievement_rate(5000, 2000), 250);
    }

    #[test]
    fn test_achievement_rate_is_monotonic_in_total() {
        let rates: Vec<u64> = (0..=5000).step_by(7).map(|t| achievement_rate(t, 1800)).collect();
        assert!(rates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_weekly_stats_scenario() {
        let events = vec![
            intake("a", "2024-01-01", 1000),
            intake("b", "2024-01-02", 2500),
        ];
        let stats = weekly_stats(&events, 2000, date("2024-01-01"));

        assert_eq!(stats.week_start, date("2024-01-01"));
        assert_eq!(stats.week_end, date("2024-01-07"));
        assert_eq!(stats.total_amount, 3500);
        assert!((stats.average_amount - 500.0).abs() < f64::EPSILON);
        assert_eq!(stats.achieved_days, 1);
        assert_eq!(stats.daily_stats.len(), 7);
        assert_eq!(stats.daily_stats[1].total_amount, 2500);
    }

    #[test]
    fn test_weekly_average_always_divides_by_seven() {
        let events = vec![intake("a", "2024-03-13", 1000)];
        let stats = weekly_stats(&events, 2000, date("2024-03-11"));
        assert!((stats.average_amount - 1000.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_window_starts_on_any_weekday() {
        // 2024-01-03 is a Wednesday
        let events = vec![
            intake("a", "2024-01-02", 900),
            intake("b", "2024-01-09", 400),
            intake("c", "2024-01-10", 800),
        ];
        let stats = weekly_stats(&events, 2000, date("2024-01-03"));

        assert_eq!(stats.week_end, date("2024-01-09"));
        assert_eq!(stats.total_amount, 400);
        let dates: Vec<NaiveDate> = stats.daily_stats.iter().map(|d| d.date).collect();
        assert_eq!(dates.first(), Some(&date("2024-01-03")));
        assert_eq!(dates.last(), Some(&date("2024-01-09")));
    }

    #[test]
    fn test_weekly_achieved_days_use_unrounded_rate() {
        let events = vec![
            intake("a", "2024-01-01", 1999),
            intake("b", "2024-01-02", 2000),
        ];
        let stats = weekly_stats(&events, 2000, date("2024-01-01"));
        assert_eq!(stats.achieved_days, 1);
    }

    #[test]
    fn test_weekly_stats_cross_month_boundary() {
        let events = vec![
            intake("a", "2024-01-31", 600),
            intake("b", "2024-02-01", 700),
        ];
        let stats = weekly_stats(&events, 2000, date("2024-01-29"));
        assert_eq!(stats.week_end, date("2024-02-04"));
        assert_eq!(stats.total_amount, 1300);
    }

    #[test]
    fn test_month_bounds_handle_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 13), 0);
        assert_eq!(
            month_bounds(2024, 4),
            Some((date("2024-04-01"), date("2024-04-30")))
        );
    }

    #[test]
    fn test_month_week_starts_are_monday_anchored() {
        // January 2024 starts on a Monday
        assert_eq!(
            month_week_starts(2024, 1),
            vec![
                date("2024-01-01"),
                date("2024-01-08"),
                date("2024-01-15"),
                date("2024-01-22"),
                date("2024-01-29"),
            ]
        );
        // September 2024 starts on a Sunday and ends on a Monday
        let starts = month_week_starts(2024, 9);
        assert_eq!(starts.first(), Some(&date("2024-08-26")));
        assert_eq!(starts.last(), Some(&date("2024-09-30")));
        assert_eq!(starts.len(), 6);
    }

    #[test]
    fn test_monday_on_or_before_steps_back() {
        assert_eq!(monday_on_or_before(date("2024-09-01")), date("2024-08-26"));
        assert_eq!(monday_on_or_before(date("2024-09-02")), date("2024-09-02"));
        assert_eq!(monday_on_or_before(date("2024-09-04")), date("2024-09-02"));
    }

    #[test]
    fn test_monthly_average_divides_by_recorded_days() {
        let events = vec![intake("a", "2024-04-10", 3000)];
        let stats = monthly_stats(&events, 2000, 2024, 4);

        assert_eq!(stats.total_amount, 3000);
        assert_eq!(stats.total_days, 1);
        assert!((stats.average_amount - 3000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_monthly_empty_month_averages_zero() {
        let stats = monthly_stats(&[], 2000, 2024, 4);
        assert_eq!(stats.total_amount, 0);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.achieved_days, 0);
        assert!(stats.average_amount.abs() < f64::EPSILON);
        assert_eq!(stats.weekly_stats.len(), 5);
    }

    #[test]
    fn test_monthly_achieved_days_compare_raw_amounts() {
        let events = vec![
            intake("a", "2024-01-01", 2000),
            intake("b", "2024-01-02", 1999),
            intake("c", "2024-01-03", 1500),
            intake("d", "2024-01-03", 600),
        ];
        let stats = monthly_stats(&events, 2000, 2024, 1);

        assert_eq!(stats.achieved_days, 2);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.total_amount, 6099);
    }

    #[test]
    fn test_zero_goal_diverges_between_week_and_month() {
        let stats = monthly_stats(&[], 0, 2024, 2);
        assert_eq!(stats.achieved_days, 29);
        assert!(stats.weekly_stats.iter().all(|w| w.achieved_days == 0));
    }

    #[test]
    fn test_monthly_boundary_weeks_ignore_other_months() {
        let events = vec![
            intake("a", "2024-08-30", 1200),
            intake("b", "2024-09-01", 800),
            intake("c", "2024-10-01", 500),
        ];
        let stats = monthly_stats(&events, 2000, 2024, 9);

        let first_week = &stats.weekly_stats[0];
        assert_eq!(first_week.week_start, date("2024-08-26"));
        assert_eq!(first_week.total_amount, 800);

        let last_week = stats.weekly_stats.last().unwrap();
        assert_eq!(last_week.week_start, date("2024-09-30"));
        assert_eq!(last_week.total_amount, 0);

        assert_eq!(stats.total_amount, 800);
    }

    #[test]
    fn test_monthly_stats_covers_leap_day() {
        let events = vec![intake("a", "2024-02-29", 2500)];
        let stats = monthly_stats(&events, 2000, 2024, 2);
        assert_eq!(stats.total_amount, 2500);
        assert_eq!(stats.achieved_days, 1);
    }

    #[test]
    fn test_invalid_month_is_empty() {
        let events = vec![intake("a", "2024-02-29", 2500)];
        let stats = monthly_stats(&events, 2000, 2024, 0);
        assert_eq!(stats.total_amount, 0);
        assert!(stats.weekly_stats.is_empty());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let events = vec![
            intake("b", "2024-05-02", 300),
            intake("a", "2024-05-01", 1700),
            intake("c", "2024-05-20", 2200),
        ];
        assert_eq!(
            monthly_stats(&events, 1800, 2024, 5),
            monthly_stats(&events, 1800, 2024, 5)
        );
        assert_eq!(
            weekly_stats(&events, 1800, date("2024-04-29")),
            weekly_stats(&events, 1800, date("2024-04-29"))
        );
    }
}
