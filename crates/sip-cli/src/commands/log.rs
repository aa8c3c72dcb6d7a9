//! Commands that add and remove intakes.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use sip_core::{
    DrinkKind, IntakeEvent, IntakeId, IntakeStore, SettingsStore, achievement_rate, daily_total,
};
use sip_db::Database;

use super::util::{format_ml, parse_date};

/// Smallest amount accepted from the command line.
pub const MIN_AMOUNT: u32 = 1;
/// Largest amount accepted from the command line.
pub const MAX_AMOUNT: u32 = 9999;

/// Logs `amount` ml of `kind`, counted towards `date` (default: today).
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    amount: u32,
    kind: &str,
    date: Option<&str>,
    now: DateTime<Local>,
) -> Result<IntakeEvent> {
    if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
        anyhow::bail!("amount must be between {MIN_AMOUNT} and {MAX_AMOUNT} ml, got {amount}");
    }
    let kind: DrinkKind = kind.parse().context("invalid drink kind")?;
    let today = now.date_naive();
    let calendar_date = match date {
        Some(s) => parse_date(s, today)?,
        None => today,
    };

    let intake = IntakeEvent::new(
        IntakeId::new(uuid::Uuid::new_v4().to_string())?,
        now.with_timezone(&Utc),
        amount,
        kind,
        calendar_date,
    );
    db.append(&intake).context("failed to store intake")?;

    writeln!(
        writer,
        "Logged {} of {} on {} (id {})",
        format_ml(u64::from(intake.amount)),
        intake.drink_kind,
        intake.calendar_date,
        intake.id
    )?;
    write_day_total(writer, db, calendar_date)?;

    Ok(intake)
}

/// Logs the preset at 1-based `index`.
pub fn preset<W: Write>(
    writer: &mut W,
    db: &mut Database,
    index: usize,
    kind: &str,
    now: DateTime<Local>,
) -> Result<IntakeEvent> {
    let presets = db.read().context("failed to read settings")?.preset_amounts;
    let Some(amount) = index.checked_sub(1).and_then(|i| presets.get(i)).copied() else {
        anyhow::bail!(
            "no preset #{index}; {} presets are configured",
            presets.len()
        );
    };
    run(writer, db, amount, kind, None, now)
}

/// Removes the intake with `id`.
pub fn remove<W: Write>(writer: &mut W, db: &mut Database, id: &str) -> Result<()> {
    let id = IntakeId::new(id)?;
    if !db.remove_by_id(&id).context("failed to remove intake")? {
        anyhow::bail!("no intake with id {id}");
    }
    writeln!(writer, "Removed {id}")?;
    Ok(())
}

fn write_day_total<W: Write>(writer: &mut W, db: &Database, date: NaiveDate) -> Result<()> {
    let goal = db.read()?.daily_goal.goal_amount;
    let total = daily_total(&db.by_exact_date(date)?);
    writeln!(
        writer,
        "{date}: {} / {} ({}%)",
        format_ml(total),
        format_ml(u64::from(goal)),
        achievement_rate(total, goal)
    )?;
    Ok(())
}
