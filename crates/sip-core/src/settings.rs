//! Goal configuration and user settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::goal::{ActivityLevel, recommended_intake};
use crate::types::Theme;

/// Goal used when nothing has been configured.
pub const DEFAULT_GOAL_ML: u32 = 2000;

/// Amounts offered for one-step logging.
pub const DEFAULT_PRESET_AMOUNTS: [u32; 4] = [200, 350, 500, 1000];

/// The active daily target and how it was set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalConfiguration {
    /// Target ml/day.
    pub goal_amount: u32,
    /// Entered directly (`true`) or derived from weight and activity.
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_weight_kg: Option<f64>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(rename = "updatedAtMillis", with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Default for GoalConfiguration {
    fn default() -> Self {
        Self {
            goal_amount: DEFAULT_GOAL_ML,
            is_custom: false,
            body_weight_kg: None,
            activity_level: ActivityLevel::default(),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl GoalConfiguration {
    /// A goal entered directly. Weight and activity from `previous` are kept.
    pub fn custom(goal_amount: u32, previous: &Self, now: DateTime<Utc>) -> Self {
        Self {
            goal_amount,
            is_custom: true,
            body_weight_kg: previous.body_weight_kg,
            activity_level: previous.activity_level,
            updated_at: now,
        }
    }

    /// A goal derived from body weight and activity.
    ///
    /// Falls back to [`DEFAULT_GOAL_ML`] when the recommendation is 0.
    pub fn computed(
        body_weight_kg: f64,
        activity_level: ActivityLevel,
        now: DateTime<Utc>,
    ) -> Self {
        let recommended = recommended_intake(body_weight_kg, activity_level);
        Self {
            goal_amount: if recommended > 0 {
                recommended
            } else {
                DEFAULT_GOAL_ML
            },
            is_custom: false,
            body_weight_kg: Some(body_weight_kg),
            activity_level,
            updated_at: now,
        }
    }
}

/// Everything the settings store persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub daily_goal: GoalConfiguration,
    pub preset_amounts: Vec<u32>,
    pub theme: Theme,
    /// Stored for forward compatibility; nothing schedules notifications.
    pub notifications: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            daily_goal: GoalConfiguration::default(),
            preset_amounts: DEFAULT_PRESET_AMOUNTS.to_vec(),
            theme: Theme::default(),
            notifications: false,
        }
    }
}

impl UserSettings {
    /// Reads a stored settings document, filling absent fields from defaults.
    ///
    /// Objects are merged key by key, so a stored `dailyGoal` that lacks
    /// `activityLevel` still picks up the default level. `null` counts as
    /// absent. Any other non-object value in storage replaces the default
    /// outright. When the merged document does not parse, top-level keys are
    /// applied one at a time and the ones that do not parse keep their
    /// defaults.
    pub fn from_stored(stored: Value) -> Result<Self, serde_json::Error> {
        let defaults = serde_json::to_value(Self::default())?;
        let mut merged = defaults.clone();
        merge_json(&mut merged, stored.clone());
        let err = match serde_json::from_value(merged) {
            Ok(settings) => return Ok(settings),
            Err(err) => err,
        };

        let Value::Object(fields) = stored else {
            return Err(err);
        };
        let mut kept = defaults;
        for (key, value) in fields {
            let mut candidate = kept.clone();
            let field: Map<String, Value> = [(key, value)].into_iter().collect();
            merge_json(&mut candidate, Value::Object(field));
            if serde_json::from_value::<Self>(candidate.clone()).is_ok() {
                kept = candidate;
            }
        }
        serde_json::from_value(kept)
    }
}

fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
