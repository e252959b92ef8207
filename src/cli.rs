use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::{ServiceError, ServiceResult};
use crate::service::Services;

#[derive(Parser, Debug)]
#[command(name = "f1-reference-data")]
#[command(version, about = "Seed and query Formula-1 reference data")]
pub struct Cli {
    /// SQLite database path (overrides configuration)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Configuration file (defaults to ./f1data.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the JSON fixtures into the database
    Seed {
        /// Directory containing the fixture files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Truncate all tables and load again even if data is present
        #[arg(short, long)]
        force: bool,
    },

    /// List all circuits, or show one by id
    Circuits {
        #[arg(allow_negative_numbers = true)]
        id: Option<i64>,
    },

    /// Circuit summaries with fastest lap and race count
    CircuitSummary {
        #[arg(allow_negative_numbers = true)]
        id: Option<i64>,
    },

    /// List all drivers, or show one by id
    Drivers {
        #[arg(allow_negative_numbers = true)]
        id: Option<i64>,
    },

    /// Driver summaries with podiums and races entered
    DriverSummary {
        #[arg(allow_negative_numbers = true)]
        id: Option<i64>,
    },

    /// Final driver standings of a season
    Championship {
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },

    /// List all table names with their fixture files
    ListTables,
}

impl Commands {
    /// Whether the command reads from the store and should trigger startup seeding
    pub fn is_query(&self) -> bool {
        !matches!(self, Commands::Seed { .. } | Commands::ListTables)
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Answer a query command as JSON.
///
/// An unknown id and a season without standings both surface as `NotFound`.
pub fn dispatch(command: &Commands, services: &Services) -> ServiceResult<Value> {
    match *command {
        Commands::Circuits { id: None } => to_json(services.circuits.get_all()?),
        Commands::Circuits { id: Some(id) } => to_json(
            services
                .circuits
                .get_by_id(id)?
                .ok_or_else(|| ServiceError::not_found("circuit", id))?,
        ),
        Commands::CircuitSummary { id: None } => to_json(services.circuits.get_summaries()?),
        Commands::CircuitSummary { id: Some(id) } => to_json(
            services
                .circuits
                .get_summary_by_id(id)?
                .ok_or_else(|| ServiceError::not_found("circuit", id))?,
        ),
        Commands::Drivers { id: None } => to_json(services.drivers.get_all()?),
        Commands::Drivers { id: Some(id) } => to_json(
            services
                .drivers
                .get_by_id(id)?
                .ok_or_else(|| ServiceError::not_found("driver", id))?,
        ),
        Commands::DriverSummary { id: None } => to_json(services.drivers.get_summaries()?),
        Commands::DriverSummary { id: Some(id) } => to_json(
            services
                .drivers
                .get_summary_by_id(id)?
                .ok_or_else(|| ServiceError::not_found("driver", id))?,
        ),
        Commands::Championship { year } => {
            let standings = services.championships.driver_championship_by_year(year)?;
            if standings.is_empty() {
                return Err(ServiceError::not_found("championship year", i64::from(year)));
            }
            to_json(standings)
        }
        Commands::Seed { .. } | Commands::ListTables => Err(ServiceError::InvalidInput(
            "command does not query reference data".to_string(),
        )),
    }
}

fn to_json<T: Serialize>(value: T) -> ServiceResult<Value> {
    serde_json::to_value(value).map_err(|err| ServiceError::Storage(err.into()))
}
