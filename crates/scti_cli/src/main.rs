//! Operator command line for the registration core.
//!
//! # Responsibility
//! - Resolve configuration from `.env`, the environment and flags.
//! - Map each subcommand onto one core contract call.
//! - Render results as human-readable text or JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;
use output::Output;
use rusqlite::Connection;
use scti_core::db::open_db;
use scti_core::{
    init_logging, ActivityId, ActivityService, Config, NewActivity, RegistrationService,
    SqliteActivityRepository, SqliteRegistrationStore,
};
use std::path::PathBuf;
use uuid::Uuid;

mod output;

#[derive(Parser, Debug)]
#[command(name = "scti", about = "Activity registration for the SCTI event", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database file
    #[arg(long, global = true, env = "SCTI_DB_PATH")]
    db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage and inspect activities
    Activities {
        #[command(subcommand)]
        command: ActivitiesCommand,
    },
    /// Sign a user up for an activity
    Signup(RegistrationArgs),
    /// Withdraw a user from an activity
    Unregister(RegistrationArgs),
    /// List a user's activities by day and time
    Schedule {
        #[arg(long)]
        user: Uuid,
    },
    /// Print the core version
    Version,
}

#[derive(Subcommand, Debug)]
enum ActivitiesCommand {
    /// List every activity
    List,
    /// Show one activity
    Show { id: ActivityId },
    /// Create an activity
    Create(CreateActivityArgs),
}

#[derive(Args, Debug)]
struct RegistrationArgs {
    #[arg(long)]
    user: Uuid,
    #[arg(long)]
    activity: ActivityId,
}

#[derive(Args, Debug)]
struct CreateActivityArgs {
    #[arg(long)]
    spots: u32,
    #[arg(long = "type")]
    activity_type: String,
    #[arg(long)]
    room: String,
    #[arg(long)]
    speaker: String,
    #[arg(long)]
    topic: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Start time, HH:MM
    #[arg(long)]
    time: String,
    #[arg(long)]
    day: i64,
}

impl From<CreateActivityArgs> for NewActivity {
    fn from(args: CreateActivityArgs) -> Self {
        Self {
            spots: args.spots,
            activity_type: args.activity_type,
            room: args.room,
            speaker: args.speaker,
            topic: args.topic,
            description: args.description,
            time: args.time,
            day: args.day,
        }
    }
}

fn main() -> Result<()> {
    load_env_file(dotenvy::dotenv())?;
    let cli = Cli::parse();
    let config = resolve_config(&cli, Config::from_env());

    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(&config.log_level, log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }
    debug!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    run(cli.command, &config, Output { json: cli.json })
}

/// Accepts a missing `.env`; a present but unreadable or malformed one fails.
fn load_env_file(loaded: Result<PathBuf, dotenvy::Error>) -> Result<()> {
    match loaded {
        Ok(path) => {
            debug!("event=env_file_load module=cli status=ok path={}", path.display());
            Ok(())
        }
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("failed to load `.env` file"),
    }
}

fn resolve_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config
}

fn run(command: Command, config: &Config, output: Output) -> Result<()> {
    match command {
        Command::Version => output.message("version", scti_core::core_version()),
        Command::Activities { command } => {
            let conn = connect(config)?;
            let service = ActivityService::new(SqliteActivityRepository::new(&conn));
            match command {
                ActivitiesCommand::List => output.many(&service.list_activities()?),
                ActivitiesCommand::Show { id } => output.one(&service.get_activity_by_id(id)?),
                ActivitiesCommand::Create(args) => {
                    let id = service.create_activity(&args.into())?;
                    output.message("created", id)
                }
            }
        }
        Command::Signup(args) => {
            let mut conn = connect(config)?;
            let mut engine = RegistrationService::new(SqliteRegistrationStore::new(&mut conn));
            engine.sign_up(args.user, args.activity)?;
            output.message("signed_up", args.activity)
        }
        Command::Unregister(args) => {
            let mut conn = connect(config)?;
            let mut engine = RegistrationService::new(SqliteRegistrationStore::new(&mut conn));
            engine.unregister(args.user, args.activity)?;
            output.message("unregistered", args.activity)
        }
        Command::Schedule { user } => {
            let conn = connect(config)?;
            let service = ActivityService::new(SqliteActivityRepository::new(&conn));
            output.many(&service.list_user_activities(user)?)
        }
    }
}

fn connect(config: &Config) -> Result<Connection> {
    open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))
}
