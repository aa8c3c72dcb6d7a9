//! Goal command: show and change the daily goal.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sip_core::{
    ActivityLevel, GoalConfiguration, SettingsStore, UserSettings, hourly_recommendation,
};
use sip_db::Database;

/// Accepted range for a custom goal, in ml.
pub const CUSTOM_GOAL_RANGE: std::ops::RangeInclusive<u32> = 1..=20_000;
/// Accepted body weight range, in kg.
pub const WEIGHT_RANGE: std::ops::RangeInclusive<f64> = 30.0..=200.0;

/// Prints the current goal and presets.
pub fn show<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let settings = db.read().context("failed to read settings")?;
    write_settings(writer, &settings)
}

/// Stores a custom goal.
pub fn set<W: Write>(
    writer: &mut W,
    db: &mut Database,
    amount: u32,
    now: DateTime<Utc>,
) -> Result<()> {
    if !CUSTOM_GOAL_RANGE.contains(&amount) {
        anyhow::bail!(
            "goal must be between {} and {} ml, got {amount}",
            CUSTOM_GOAL_RANGE.start(),
            CUSTOM_GOAL_RANGE.end()
        );
    }

    let mut settings = db.read().context("failed to read settings")?;
    settings.daily_goal = GoalConfiguration::custom(amount, &settings.daily_goal, now);
    db.write(&settings).context("failed to save settings")?;
    tracing::info!(goal = amount, "custom goal set");

    write_settings(writer, &settings)
}

/// Derives and stores the goal from weight and activity.
pub fn compute<W: Write>(
    writer: &mut W,
    db: &mut Database,
    weight: f64,
    activity: ActivityLevel,
    now: DateTime<Utc>,
) -> Result<()> {
    if !WEIGHT_RANGE.contains(&weight) {
        anyhow::bail!(
            "weight must be between {} and {} kg, got {weight}",
            WEIGHT_RANGE.start(),
            WEIGHT_RANGE.end()
        );
    }

    let mut settings = db.read().context("failed to read settings")?;
    settings.daily_goal = GoalConfiguration::computed(weight, activity, now);
    db.write(&settings).context("failed to save settings")?;
    tracing::info!(goal = settings.daily_goal.goal_amount, %activity, "computed goal set");

    write_settings(writer, &settings)
}

fn write_settings<W: Write>(writer: &mut W, settings: &UserSettings) -> Result<()> {
    let goal = &settings.daily_goal;
    let source = if goal.is_custom {
        "custom".to_string()
    } else {
        match goal.body_weight_kg {
            Some(weight) => format!("computed from {weight} kg, {} activity", goal.activity_level),
            None => "default".to_string(),
        }
    };

    writeln!(writer, "Daily goal:  {} ml ({source})", goal.goal_amount)?;
    writeln!(
        writer,
        "Hourly plan: {} ml/h over 16 waking hours",
        hourly_recommendation(goal.goal_amount)
    )?;
    writeln!(writer, "Presets:")?;
    for (i, amount) in settings.preset_amounts.iter().enumerate() {
        writeln!(writer, "  {}. {amount} ml", i + 1)?;
    }
    Ok(())
}
