//! Storage ports for intakes and settings.
//!
//! The aggregation code never touches storage; callers fetch a snapshot
//! through these traits and hand it over. [`MemoryStore`] implements both
//! ports without persistence.

use std::convert::Infallible;

use chrono::NaiveDate;
use serde_json::Value;

use crate::intake::IntakeEvent;
use crate::settings::UserSettings;
use crate::types::IntakeId;

/// An append-only collection of intake events.
pub trait IntakeStore {
    type Error;

    /// Stores a new intake.
    fn append(&mut self, intake: &IntakeEvent) -> Result<(), Self::Error>;

    /// Removes an intake, returning whether it existed.
    fn remove_by_id(&mut self, id: &IntakeId) -> Result<bool, Self::Error>;

    /// All intakes ordered by calendar date, then time, then ID.
    fn all(&self) -> Result<Vec<IntakeEvent>, Self::Error>;

    /// Intakes with `start <= calendar_date <= end`, in the order of [`Self::all`].
    fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<IntakeEvent>, Self::Error>;

    /// Intakes attributed to exactly `date`.
    fn by_exact_date(&self, date: NaiveDate) -> Result<Vec<IntakeEvent>, Self::Error> {
        self.by_date_range(date, date)
    }
}

/// Holder of the current [`UserSettings`].
pub trait SettingsStore {
    type Error;

    /// Current settings; fields absent in storage come from defaults.
    fn read(&self) -> Result<UserSettings, Self::Error>;

    fn write(&mut self, settings: &UserSettings) -> Result<(), Self::Error>;
}

/// In-memory implementation of both ports.
///
/// Settings are kept as a JSON document so reads go through the same
/// merge-with-defaults path as persistent stores.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    intakes: Vec<IntakeEvent>,
    settings: Option<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the raw settings document, as an older version might have written it.
    #[must_use]
    pub fn with_settings_document(mut self, document: Value) -> Self {
        self.settings = Some(document);
        self
    }

    fn sorted(mut intakes: Vec<IntakeEvent>) -> Vec<IntakeEvent> {
        intakes.sort_by(|a, b| {
            a.calendar_date
                .cmp(&b.calendar_date)
                .then(a.occurred_at.cmp(&b.occurred_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        intakes
    }
}

impl IntakeStore for MemoryStore {
    type Error = Infallible;

    fn append(&mut self, intake: &IntakeEvent) -> Result<(), Self::Error> {
        self.intakes.push(intake.clone());
        Ok(())
    }

    fn remove_by_id(&mut self, id: &IntakeId) -> Result<bool, Self::Error> {
        let before = self.intakes.len();
        self.intakes.retain(|i| &i.id != id);
        Ok(self.intakes.len() != before)
    }

    fn all(&self) -> Result<Vec<IntakeEvent>, Self::Error> {
        Ok(Self::sorted(self.intakes.clone()))
    }

    fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<IntakeEvent>, Self::Error> {
        let matching = self
            .intakes
            .iter()
            .filter(|i| i.calendar_date >= start && i.calendar_date <= end)
            .cloned()
            .collect();
        Ok(Self::sorted(matching))
    }
}

impl SettingsStore for MemoryStore {
    type Error = serde_json::Error;

    fn read(&self) -> Result<UserSettings, Self::Error> {
        match &self.settings {
            Some(document) => UserSettings::from_stored(document.clone()),
            None => Ok(UserSettings::default()),
        }
    }

    fn write(&mut self, settings: &UserSettings) -> Result<(), Self::Error> {
        self.settings = Some(serde_json::to_value(settings)?);
        Ok(())
    }
}
