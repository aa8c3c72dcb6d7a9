//! CLI subcommand implementations.

pub mod export;
pub mod goal;
pub mod history;
pub mod log;
pub mod month;
pub mod reset;
pub mod today;
pub mod util;
pub mod week;
