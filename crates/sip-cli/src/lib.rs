//! Hydration tracker CLI library.
//!
//! This crate provides the CLI interface for the hydration tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, GoalAction, PeriodArg};
pub use config::Config;
