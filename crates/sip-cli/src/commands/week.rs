//! Week command: seven day rollup.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{Days, NaiveDate};
use sip_core::aggregation::monday_on_or_before;
use sip_core::progress::progress_bar;
use sip_core::{IntakeStore, SettingsStore, WeeklyStats, achievement_rate, weekly_stats};
use sip_db::Database;

use super::util::{format_ml, parse_date};

/// Computes weekly stats starting at `start`, or at this week's Monday.
pub fn generate(db: &Database, start: Option<&str>, today: NaiveDate) -> Result<WeeklyStats> {
    let week_start = match start {
        Some(s) => parse_date(s, today)?,
        None => monday_on_or_before(today),
    };
    let week_end = week_start
        .checked_add_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX);

    let goal = db.read()?.daily_goal.goal_amount;
    let intakes = db.by_date_range(week_start, week_end)?;
    tracing::debug!(%week_start, intakes = intakes.len(), goal, "computing weekly stats");
    Ok(weekly_stats(&intakes, goal, week_start))
}

/// Formats the human-readable weekly report.
pub fn format_week(stats: &WeeklyStats) -> String {
    let mut output = String::new();

    writeln!(output, "WEEK: {} to {}", stats.week_start, stats.week_end).unwrap();
    writeln!(output).unwrap();

    for day in &stats.daily_stats {
        let rate = achievement_rate(day.total_amount, day.goal_amount);
        let mark = if day.achievement_rate >= 100.0 { " *" } else { "" };
        writeln!(
            output,
            "{}  {:>8}  {}  {rate:>3}%{mark}",
            day.date.format("%a %m-%d"),
            format_ml(day.total_amount),
            progress_bar(day.total_amount, day.goal_amount)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Total:     {}", format_ml(stats.total_amount)).unwrap();
    writeln!(output, "Average:   {:.0} ml/day", stats.average_amount).unwrap();
    writeln!(output, "Achieved:  {} of 7 days", stats.achieved_days).unwrap();

    output
}

/// Runs the week command.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    start: Option<&str>,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let stats = generate(db, start, today)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&stats)?)?;
    } else {
        write!(writer, "{}", format_week(&stats))?;
    }
    Ok(())
}
