//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sip_core::{ActivityLevel, HistoryPeriod};

/// Hydration tracker.
///
/// Logs drinks and reports progress against a daily goal, with day, week and
/// month rollups.
#[derive(Debug, Parser)]
#[command(name = "sip", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log a drink.
    Log {
        /// Amount in ml (1-9999).
        amount: u32,

        /// What was drunk (e.g., water, other).
        #[arg(long, default_value = "water")]
        kind: String,

        /// Day to count it towards: YYYY-MM-DD, today, yesterday or "N days ago".
        #[arg(long)]
        date: Option<String>,
    },

    /// Log one of the configured preset amounts.
    Preset {
        /// Preset number as listed by `sip goal show` (starting at 1).
        index: usize,

        /// What was drunk.
        #[arg(long, default_value = "water")]
        kind: String,
    },

    /// Remove a logged drink.
    Remove {
        /// The intake ID printed when it was logged.
        id: String,
    },

    /// Show today's progress.
    Today {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a seven day rollup.
    Week {
        /// First day of the window (default: Monday of this week).
        #[arg(long)]
        start: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a calendar month rollup.
    Month {
        /// Year (default: current year).
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (default: current month).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show per-day history for recorded days.
    History {
        /// Window to show.
        #[arg(long, value_enum, default_value_t = PeriodArg::Week)]
        period: PeriodArg,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show or change the daily goal.
    #[command(subcommand)]
    Goal(GoalAction),

    /// Export all data as JSON.
    Export,

    /// Delete all intakes and settings.
    Reset {
        /// Confirm deletion.
        #[arg(long)]
        yes: bool,
    },
}

/// Goal management actions.
#[derive(Debug, Subcommand)]
pub enum GoalAction {
    /// Show the current goal and presets.
    Show,

    /// Set a custom goal in ml.
    Set {
        /// Daily goal in ml (1-20000).
        amount: u32,
    },

    /// Derive the goal from body weight and activity level.
    Compute {
        /// Body weight in kg (30-200).
        #[arg(long)]
        weight: f64,

        /// Activity level: light, moderate or intense.
        #[arg(long, default_value = "moderate")]
        activity: ActivityLevel,
    },
}

/// History window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Week,
    Month,
    All,
}

impl From<PeriodArg> for HistoryPeriod {
    fn from(period: PeriodArg) -> Self {
        match period {
            PeriodArg::Week => Self::Week,
            PeriodArg::Month => Self::Month,
            PeriodArg::All => Self::All,
        }
    }
}
