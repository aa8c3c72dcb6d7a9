//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Days, NaiveDate};
use regex::Regex;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: u64 = 1000 * 366;

/// Parse a calendar date as ISO, a keyword or a relative offset from `today`.
///
/// Supports:
/// - ISO: "2026-01-15"
/// - Keywords: "today", "yesterday"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    match s {
        "today" => return Ok(today),
        "yesterday" => {
            return today
                .pred_opt()
                .context("date out of range");
        }
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-15), today, yesterday or relative (e.g., '3 days ago')"
        );
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;

    let days = match &caps[2] {
        "day" => n,
        "week" => n.saturating_mul(7),
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };

    if days > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date too far back: {s}");
    }

    today
        .checked_sub_days(Days::new(days))
        .context("date out of range")
}

/// Formats an amount in ml with a unit suffix.
pub fn format_ml(amount: u64) -> String {
    format!("{amount} ml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_parses_iso_and_keywords() {
        let today = date("2024-03-01");
        assert_eq!(parse_date("2024-01-15", today).unwrap(), date("2024-01-15"));
        assert_eq!(parse_date("today", today).unwrap(), today);
        assert_eq!(parse_date("yesterday", today).unwrap(), date("2024-02-29"));
    }

    #[test]
    fn test_parses_relative_offsets() {
        let today = date("2024-03-01");
        assert_eq!(parse_date("3 days ago", today).unwrap(), date("2024-02-27"));
        assert_eq!(parse_date("1 day ago", today).unwrap(), date("2024-02-29"));
        assert_eq!(parse_date("2 weeks ago", today).unwrap(), date("2024-02-16"));
    }

    #[test]
    fn test_rejects_garbage() {
        let today = date("2024-03-01");
        assert!(parse_date("2024/01/15", today).is_err());
        assert!(parse_date("soon", today).is_err());
        assert!(parse_date("999999999 days ago", today).is_err());
    }
}
