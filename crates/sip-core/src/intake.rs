//! Logged intake events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DrinkKind, IntakeId};

/// One logged consumption of liquid.
///
/// `calendar_date` is fixed when the event is created and is the only key
/// used for bucketing. It is never re-derived from `occurred_at`, so the two
/// can disagree if the local timezone changed after logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeEvent {
    /// Unique identifier for this intake.
    pub id: IntakeId,
    /// When the intake was logged.
    #[serde(rename = "occurredAtMillis", with = "chrono::serde::ts_milliseconds")]
    pub occurred_at: DateTime<Utc>,
    /// Volume in milliliters.
    pub amount: u32,
    /// What was drunk.
    #[serde(default)]
    pub drink_kind: DrinkKind,
    /// Local calendar day the intake counts towards.
    pub calendar_date: NaiveDate,
}

impl IntakeEvent {
    pub const fn new(
        id: IntakeId,
        occurred_at: DateTime<Utc>,
        amount: u32,
        drink_kind: DrinkKind,
        calendar_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            occurred_at,
            amount,
            drink_kind,
            calendar_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    #[test]
    fn test_intake_serializes_with_millis_and_iso_date() {
        let intake = IntakeEvent::new(
            IntakeId::new("i-1").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
            350,
            DrinkKind::water(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );

        let json = serde_json::to_value(&intake).unwrap();
        assert_eq!(json["occurredAtMillis"], 1_704_101_400_000_i64);
        assert_eq!(json["calendarDate"], "2024-01-01");
        assert_eq!(json["drinkKind"], "water");

        let parsed: IntakeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, intake);
    }

    #[test]
    fn test_intake_rejects_empty_id() {
        let json = r#"{
            "id": "",
            "occurredAtMillis": 0,
            "amount": 200,
            "drinkKind": "water",
            "calendarDate": "2024-01-01"
        }"#;
        let result: Result<IntakeEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_drink_kind_defaults_to_water() {
        let json = r#"{
            "id": "i-2",
            "occurredAtMillis": 0,
            "amount": 200,
            "calendarDate": "2024-01-01"
        }"#;
        let parsed: IntakeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.drink_kind, DrinkKind::water());
    }
}
