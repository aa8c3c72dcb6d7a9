//! History command: per-day series for recorded days.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use sip_core::progress::progress_bar;
use sip_core::{
    ChartPoint, HistoryPeriod, HistorySummary, IntakeStore, SettingsStore, chart_series, summarize,
};
use sip_db::Database;

use super::util::format_ml;

/// Computed history data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub period: HistoryPeriod,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub timezone: String,
    pub points: Vec<ChartPoint>,
    pub summary: HistorySummary,
}

/// Generates history data from the database.
pub fn generate(
    db: &Database,
    period: HistoryPeriod,
    today: NaiveDate,
    timezone: String,
) -> Result<HistoryReport> {
    let (start, end) = period.range(today);
    let goal = db.read()?.daily_goal.goal_amount;
    let intakes = db.by_date_range(start, end)?;
    let points = chart_series(&intakes, goal, start, end, period.display_days());
    let summary = summarize(&points);

    Ok(HistoryReport {
        period,
        start,
        end,
        timezone,
        points,
        summary,
    })
}

/// Formats the human-readable history.
pub fn format_history(report: &HistoryReport) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "HISTORY ({}): {} to {}",
        report.period, report.start, report.end
    )
    .unwrap();

    if report.points.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No drinks recorded in this period.").unwrap();
        return output;
    }

    writeln!(output).unwrap();
    for point in &report.points {
        writeln!(
            output,
            "{}  {:>8}  {}  {:>3}%",
            point.date.format("%m/%d"),
            format_ml(point.amount),
            progress_bar(point.amount, point.goal),
            point.achievement
        )
        .unwrap();
    }

    let summary = &report.summary;
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Recorded days:  {}", summary.total_days).unwrap();
    writeln!(
        output,
        "Achieved:       {} ({}%)",
        summary.achieved_days, summary.achievement_rate
    )
    .unwrap();
    writeln!(output, "Average:        {}", format_ml(summary.average_intake)).unwrap();
    writeln!(output, "Best day:       {}", format_ml(summary.max_intake)).unwrap();

    output
}

/// Runs the history command.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    period: HistoryPeriod,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
    let report = generate(db, period, today, timezone)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_history(&report))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Utc};
    use insta::assert_snapshot;
    use sip_core::{DrinkKind, IntakeEvent, IntakeId};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn seeded_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        for (id, day, amount) in [
            ("a", "2024-03-02", 1999),
            ("b", "2024-03-05", 600),
            ("c", "2024-03-05", 400),
            ("d", "2024-03-07", 2600),
            ("old", "2024-02-01", 5000),
        ] {
            db.append(&IntakeEvent::new(
                IntakeId::new(id).unwrap(),
                DateTime::<Utc>::UNIX_EPOCH,
                amount,
                DrinkKind::water(),
                date(day),
            ))
            .unwrap();
        }
        db
    }

    #[test]
    fn test_history_week() {
        let db = seeded_db();
        let report = generate(&db, HistoryPeriod::Week, date("2024-03-08"), "UTC".into()).unwrap();

        assert_eq!(report.start, date("2024-03-01"));
        assert_snapshot!(format_history(&report), @r"
        HISTORY (week): 2024-03-01 to 2024-03-08

        03/02   1999 ml  ██████████  100%
        03/05   1000 ml  █████░░░░░   50%
        03/07   2600 ml  ██████████  130%

        SUMMARY
        ───────
        Recorded days:  3
        Achieved:       2 (67%)
        Average:        1866 ml
        Best day:       2600 ml
        ");
    }

    #[test]
    fn test_history_all_includes_older_days() {
        let db = seeded_db();
        let report = generate(&db, HistoryPeriod::All, date("2024-03-08"), "UTC".into()).unwrap();
        assert_eq!(report.points.len(), 4);
        assert_eq!(report.summary.max_intake, 5000);
    }

    #[test]
    fn test_history_empty() {
        let db = Database::open_in_memory().unwrap();
        let report = generate(&db, HistoryPeriod::Month, date("2024-03-08"), "UTC".into()).unwrap();
        let output = format_history(&report);
        assert!(output.contains("No drinks recorded in this period."));
        assert_eq!(report.summary, HistorySummary::default());
    }
}
