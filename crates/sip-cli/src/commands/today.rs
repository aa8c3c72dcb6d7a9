//! Today command: progress against the daily goal.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::Serialize;
use sip_core::goal::hours_left_in_day;
use sip_core::progress::progress_bar;
use sip_core::{
    Celebration, IntakeEvent, IntakeStore, ProgressTier, SettingsStore, achievement_rate,
    celebration, daily_stats, hourly_recommendation, progress_tier, progress_width,
    remaining_per_hour,
};
use sip_db::Database;

use super::util::format_ml;

/// One intake as listed under today's progress.
#[derive(Debug, Clone, Serialize)]
pub struct TodayEntry {
    pub id: String,
    /// Local time of day the intake was logged.
    pub time: NaiveTime,
    pub amount: u32,
    pub kind: String,
}

/// Computed view of today's progress.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayView {
    pub date: NaiveDate,
    pub total_amount: u64,
    pub goal_amount: u32,
    /// Rounded rate, not capped.
    pub achievement_rate: u64,
    /// Rate capped at 100, for bar rendering.
    pub progress_width: f64,
    pub tier: ProgressTier,
    pub hourly_target: u32,
    pub hours_left: i64,
    pub remaining_per_hour: u64,
    pub celebration: Option<Celebration>,
    pub intakes: Vec<TodayEntry>,
}

/// Builds today's view from the day's intakes.
pub fn build_view(
    intakes: &[IntakeEvent],
    goal_amount: u32,
    date: NaiveDate,
    now: NaiveTime,
    wake_end_hour: u32,
) -> TodayView {
    let stats = daily_stats(intakes, goal_amount, date);
    let hours_left = hours_left_in_day(now, wake_end_hour);

    let intakes = intakes
        .iter()
        .filter(|i| i.calendar_date == date)
        .map(|i| TodayEntry {
            id: i.id.to_string(),
            time: i.occurred_at.with_timezone(&Local).time(),
            amount: i.amount,
            kind: i.drink_kind.to_string(),
        })
        .collect();

    TodayView {
        date,
        total_amount: stats.total_amount,
        goal_amount,
        achievement_rate: achievement_rate(stats.total_amount, goal_amount),
        progress_width: progress_width(stats.total_amount, goal_amount),
        tier: progress_tier(stats.achievement_rate),
        hourly_target: hourly_recommendation(goal_amount),
        hours_left,
        remaining_per_hour: remaining_per_hour(stats.total_amount, goal_amount, hours_left),
        celebration: celebration(stats.achievement_rate),
        intakes,
    }
}

/// Formats the human-readable view.
pub fn format_today(view: &TodayView) -> String {
    let mut output = String::new();

    writeln!(output, "TODAY: {}", view.date.format("%A, %b %-d, %Y")).unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Intake:    {} / {} ({}%)",
        format_ml(view.total_amount),
        format_ml(u64::from(view.goal_amount)),
        view.achievement_rate
    )
    .unwrap();
    writeln!(
        output,
        "Progress:  {}  {}",
        progress_bar(view.total_amount, view.goal_amount),
        view.tier
    )
    .unwrap();

    if view.remaining_per_hour > 0 {
        writeln!(
            output,
            "Pace:      {} ml/h to finish ({}h left, plan {} ml/h)",
            view.remaining_per_hour, view.hours_left, view.hourly_target
        )
        .unwrap();
    } else {
        writeln!(output, "Pace:      goal reached").unwrap();
    }

    if let Some(celebration) = view.celebration {
        writeln!(output).unwrap();
        writeln!(output, "{}", celebration.message()).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "INTAKES").unwrap();
    writeln!(output, "───────").unwrap();
    if view.intakes.is_empty() {
        writeln!(output, "No drinks logged yet.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'sip log <ml>' to record one.").unwrap();
        return output;
    }
    for entry in &view.intakes {
        let amount = format_ml(u64::from(entry.amount));
        writeln!(
            output,
            "{}  {amount:>8}  {:<8}{}",
            entry.time.format("%H:%M"),
            entry.kind,
            entry.id
        )
        .unwrap();
    }

    output
}

/// Runs the today command.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    json: bool,
    now: DateTime<Local>,
    wake_end_hour: u32,
) -> Result<()> {
    let today = now.date_naive();
    let goal = db.read()?.daily_goal.goal_amount;
    let intakes = db.by_exact_date(today)?;
    let view = build_view(&intakes, goal, today, now.time(), wake_end_hour);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&view)?)?;
    } else {
        write!(writer, "{}", format_today(&view))?;
    }
    Ok(())
}
