//! Core domain logic for the hydration tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Aggregation: daily, weekly and monthly statistics from intake events
//! - Goals: recommended daily intake and hourly pacing
//! - Progress: display tiers, capped widths and milestones
//! - Storage ports: the traits persistent stores implement

pub mod aggregation;
pub mod chart;
pub mod goal;
pub mod intake;
pub mod progress;
pub mod settings;
pub mod store;
pub mod types;

pub use aggregation::{
    DailyStats, MonthlyStats, WeeklyStats, achievement_rate, daily_stats, daily_total,
    monthly_stats, weekly_stats,
};
pub use chart::{ChartPoint, HistoryPeriod, HistorySummary, chart_series, summarize};
pub use goal::{ActivityLevel, hourly_recommendation, recommended_intake, remaining_per_hour};
pub use intake::IntakeEvent;
pub use progress::{Celebration, ProgressTier, celebration, progress_tier, progress_width};
pub use settings::{GoalConfiguration, UserSettings};
pub use store::{IntakeStore, MemoryStore, SettingsStore};
pub use types::{DrinkKind, IntakeId, Theme, ValidationError};
