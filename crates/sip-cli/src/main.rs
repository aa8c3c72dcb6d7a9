use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sip_cli::commands::{export, goal, history, log, month, reset, today, week};
use sip_cli::{Cli, Commands, Config, GoalAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(sip_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let mut db =
        sip_db::Database::open(&config.database_path).context("failed to open database")?;
    db.migrate().context("failed to migrate database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Log to stderr so JSON output stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let now = Local::now();
    let mut out = std::io::stdout().lock();

    match command {
        Commands::Log { amount, kind, date } => {
            log::run(&mut out, &mut db, *amount, kind, date.as_deref(), now)?;
        }
        Commands::Preset { index, kind } => {
            log::preset(&mut out, &mut db, *index, kind, now)?;
        }
        Commands::Remove { id } => log::remove(&mut out, &mut db, id)?,
        Commands::Today { json } => {
            today::run(&mut out, &db, *json, now, config.wake_end_hour)?;
        }
        Commands::Week { start, json } => {
            week::run(&mut out, &db, start.as_deref(), *json, now.date_naive())?;
        }
        Commands::Month { year, month, json } => {
            month::run(&mut out, &db, *year, *month, *json, now.date_naive())?;
        }
        Commands::History { period, json } => {
            history::run(&mut out, &db, (*period).into(), *json, now.date_naive())?;
        }
        Commands::Goal(action) => match action {
            GoalAction::Show => goal::show(&mut out, &db)?,
            GoalAction::Set { amount } => goal::set(&mut out, &mut db, *amount, Utc::now())?,
            GoalAction::Compute { weight, activity } => {
                goal::compute(&mut out, &mut db, *weight, *activity, Utc::now())?;
            }
        },
        Commands::Export => export::run(&mut out, &db, Utc::now())?,
        Commands::Reset { yes } => reset::run(&mut out, &mut db, *yes)?,
    }

    Ok(())
}
