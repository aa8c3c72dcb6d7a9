//! Export command: dump intakes and settings as JSON.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sip_db::Database;

/// Writes the export document to `writer`.
pub fn run<W: Write>(writer: &mut W, db: &Database, now: DateTime<Utc>) -> Result<()> {
    let document = db.export(now).context("failed to collect export data")?;
    tracing::debug!(intakes = document.intakes.len(), "exporting");
    writeln!(writer, "{}", serde_json::to_string_pretty(&document)?)?;
    Ok(())
}
