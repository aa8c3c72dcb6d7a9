//! Month command: calendar month rollup.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use sip_core::aggregation::month_bounds;
use sip_core::{IntakeStore, MonthlyStats, SettingsStore, monthly_stats};
use sip_db::Database;

use super::util::format_ml;

/// Computes monthly stats, defaulting to the month containing `today`.
pub fn generate(
    db: &Database,
    year: Option<i32>,
    month: Option<u32>,
    today: NaiveDate,
) -> Result<MonthlyStats> {
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());
    let (start, end) =
        month_bounds(year, month).with_context(|| format!("invalid month {year}-{month}"))?;

    let goal = db.read()?.daily_goal.goal_amount;
    let intakes = db.by_date_range(start, end)?;
    tracing::debug!(year, month, intakes = intakes.len(), goal, "computing monthly stats");
    Ok(monthly_stats(&intakes, goal, year, month))
}

/// Formats the human-readable monthly report.
pub fn format_month(stats: &MonthlyStats) -> String {
    let mut output = String::new();

    let title = NaiveDate::from_ymd_opt(stats.year, stats.month, 1).map_or_else(
        || format!("{}-{:02}", stats.year, stats.month),
        |d| d.format("%B %Y").to_string(),
    );
    writeln!(output, "MONTH: {title}").unwrap();
    writeln!(output).unwrap();

    writeln!(output, "BY WEEK").unwrap();
    writeln!(output, "───────").unwrap();
    for week in &stats.weekly_stats {
        writeln!(
            output,
            "{} to {}  {:>9}  avg {:>4.0} ml/day  {} achieved",
            week.week_start.format("%m-%d"),
            week.week_end.format("%m-%d"),
            format_ml(week.total_amount),
            week.average_amount,
            week.achieved_days
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Total:          {}", format_ml(stats.total_amount)).unwrap();
    writeln!(output, "Recorded days:  {}", stats.total_days).unwrap();
    writeln!(
        output,
        "Average:        {:.0} ml per recorded day",
        stats.average_amount
    )
    .unwrap();
    writeln!(output, "Achieved:       {} days", stats.achieved_days).unwrap();

    output
}

/// Runs the month command.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    year: Option<i32>,
    month: Option<u32>,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let stats = generate(db, year, month, today)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&stats)?)?;
    } else {
        write!(writer, "{}", format_month(&stats))?;
    }
    Ok(())
}
