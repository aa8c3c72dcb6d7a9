//! Storage layer for the hydration tracker.
//!
//! Provides persistence for intakes and settings using `rusqlite`, behind the
//! [`IntakeStore`] and [`SettingsStore`] ports from `sip-core`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Date Format
//!
//! Calendar dates are stored as TEXT in zero-padded ISO format (`2024-01-15`).
//! Lexicographic ordering of these strings matches chronological ordering, so
//! range queries compare the text directly.
//!
//! ## Settings Storage
//!
//! Settings live in a key/value table as a single JSON document. Reads merge
//! the document over the defaults, so fields added in later versions are
//! filled in for data written by earlier ones.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use thiserror::Error;

use sip_core::{IntakeEvent, IntakeId, IntakeStore, SettingsStore, UserSettings, ValidationError};

/// Version written to the `meta` table by [`Database::migrate`].
pub const DATA_VERSION: &str = "1.0.0";

const SETTINGS_KEY: &str = "user_settings";
const VERSION_KEY: &str = "data_version";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to encode settings as JSON.
    #[error("settings encoding error: {0}")]
    Json(#[from] serde_json::Error),
    /// A stored calendar date could not be parsed.
    #[error("invalid calendar date for intake {intake_id}: {value}")]
    DateParse {
        intake_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored timestamp is out of range.
    #[error("invalid timestamp for intake {intake_id}: {millis}")]
    TimestampRange { intake_id: String, millis: i64 },
    /// A stored row failed core validation.
    #[error("invalid intake data: {0}")]
    Validation(#[from] ValidationError),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Everything stored, in one serializable document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub intakes: Vec<IntakeEvent>,
    pub settings: UserSettings,
}

/// A raw row from the `intakes` table.
struct IntakeRow {
    id: String,
    occurred_at_ms: i64,
    amount: u32,
    drink_kind: String,
    calendar_date: String,
}

impl IntakeRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            occurred_at_ms: row.get(1)?,
            amount: row.get(2)?,
            drink_kind: row.get(3)?,
            calendar_date: row.get(4)?,
        })
    }

    fn into_intake(self) -> Result<IntakeEvent, DbError> {
        let calendar_date =
            NaiveDate::parse_from_str(&self.calendar_date, "%Y-%m-%d").map_err(|source| {
                DbError::DateParse {
                    intake_id: self.id.clone(),
                    value: self.calendar_date.clone(),
                    source,
                }
            })?;
        let occurred_at = DateTime::from_timestamp_millis(self.occurred_at_ms).ok_or_else(|| {
            DbError::TimestampRange {
                intake_id: self.id.clone(),
                millis: self.occurred_at_ms,
            }
        })?;

        Ok(IntakeEvent::new(
            IntakeId::new(self.id)?,
            occurred_at,
            self.amount,
            self.drink_kind.parse()?,
            calendar_date,
        ))
    }
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Intakes table: one row per logged drink
            -- occurred_at_ms: epoch milliseconds
            -- calendar_date: ISO date (e.g., '2024-01-15'), fixed at creation
            CREATE TABLE IF NOT EXISTS intakes (
                id TEXT PRIMARY KEY,
                occurred_at_ms INTEGER NOT NULL,
                amount INTEGER NOT NULL,
                drink_kind TEXT NOT NULL,
                calendar_date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_intakes_date ON intakes(calendar_date);

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Returns the stored data version, if any.
    pub fn data_version(&self) -> Result<Option<String>, DbError> {
        let version = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?",
                [VERSION_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version)
    }

    /// Brings stored data up to [`DATA_VERSION`].
    ///
    /// Returns the previous version when a migration ran. There are no data
    /// transformations yet; the version is recorded so later releases know
    /// what they are reading.
    pub fn migrate(&mut self) -> Result<Option<String>, DbError> {
        let current = self.data_version()?;
        if current.as_deref() == Some(DATA_VERSION) {
            return Ok(None);
        }

        let from = current.unwrap_or_else(|| "0.0.0".to_string());
        tracing::info!(from = %from, to = DATA_VERSION, "migrating data");
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![VERSION_KEY, DATA_VERSION],
        )?;
        Ok(Some(from))
    }

    /// Deletes all intakes, settings and version information.
    pub fn clear_all(&mut self) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM intakes", [])?;
        tx.execute("DELETE FROM settings", [])?;
        tx.execute("DELETE FROM meta", [])?;
        tx.commit()?;
        tracing::info!(intakes = removed, "cleared all data");
        Ok(())
    }

    /// Collects every intake and the current settings into one document.
    pub fn export(&self, now: DateTime<Utc>) -> Result<ExportDocument, DbError> {
        Ok(ExportDocument {
            version: DATA_VERSION.to_string(),
            export_date: now,
            intakes: self.all()?,
            settings: self.read()?,
        })
    }

    fn query_intakes(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<IntakeEvent>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, IntakeRow::from_row)?;
        let mut intakes = Vec::new();
        for row in rows {
            intakes.push(row?.into_intake()?);
        }
        Ok(intakes)
    }
}

impl IntakeStore for Database {
    type Error = DbError;

    fn append(&mut self, intake: &IntakeEvent) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO intakes (id, occurred_at_ms, amount, drink_kind, calendar_date)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                intake.id.as_str(),
                intake.occurred_at.timestamp_millis(),
                intake.amount,
                intake.drink_kind.as_str(),
                format_date(intake.calendar_date),
            ],
        )?;
        tracing::debug!(
            id = %intake.id,
            amount = intake.amount,
            date = %intake.calendar_date,
            "intake stored"
        );
        Ok(())
    }

    fn remove_by_id(&mut self, id: &IntakeId) -> Result<bool, DbError> {
        let removed = self
            .conn
            .execute("DELETE FROM intakes WHERE id = ?", [id.as_str()])?;
        tracing::debug!(id = %id, removed, "intake removal");
        Ok(removed > 0)
    }

    fn all(&self) -> Result<Vec<IntakeEvent>, DbError> {
        self.query_intakes(
            "
            SELECT id, occurred_at_ms, amount, drink_kind, calendar_date
            FROM intakes
            ORDER BY calendar_date ASC, occurred_at_ms ASC, id ASC
            ",
            params![],
        )
    }

    fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<IntakeEvent>, DbError> {
        self.query_intakes(
            "
            SELECT id, occurred_at_ms, amount, drink_kind, calendar_date
            FROM intakes
            WHERE calendar_date >= ? AND calendar_date <= ?
            ORDER BY calendar_date ASC, occurred_at_ms ASC, id ASC
            ",
            [format_date(start), format_date(end)],
        )
    }
}

impl SettingsStore for Database {
    type Error = DbError;

    /// Reads settings, falling back to defaults for absent or unreadable data.
    fn read(&self) -> Result<UserSettings, DbError> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                [SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(stored) = stored else {
            return Ok(UserSettings::default());
        };

        let parsed = serde_json::from_str(&stored).and_then(UserSettings::from_stored);
        match parsed {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(error = %e, "stored settings unreadable, using defaults");
                Ok(UserSettings::default())
            }
        }
    }

    fn write(&mut self, settings: &UserSettings) -> Result<(), DbError> {
        let value = serde_json::to_string(settings)?;
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![SETTINGS_KEY, value],
        )?;
        tracing::debug!(goal = settings.daily_goal.goal_amount, "settings saved");
        Ok(())
    }
}

/// Formats a date as zero-padded `YYYY-MM-DD` for storage.
fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
