use anyhow::Result;
use f1_reference_data::{
    cli::{dispatch, Cli, Commands},
    config::AppConfig,
    error::ServiceError,
    loader::{seed_on_startup, ConsoleProgress, Seeder, SilentProgress},
    schema::DependencyResolver,
    service::Services,
    store::Database,
};
use serde::Serialize;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ServiceError>() {
                Some(service_err) => eprintln!("{}: {}", service_err.status_code(), service_err),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        config.database.path = path;
    }

    // Logs go to stderr so stdout carries only query output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();

    if let Commands::ListTables = cli.command {
        println!("Available tables:\n");
        for table in DependencyResolver::new().load_order()? {
            println!("  {:<18} <- {}", table.name, table.source_file);
        }
        return Ok(());
    }

    tracing::info!(database = ?config.database.path, "Opening database");
    let db = Database::open(&config.database.path)?;

    if cli.command.is_query() && config.seed.on_startup {
        let seeder = Seeder::new(db.clone(), &config.seed.data_dir);
        seed_on_startup(&seeder, &mut SilentProgress::new());
    }

    let services = Services::from_database(&db, config.validation.min_year);

    match cli.command {
        Commands::Seed { data_dir, force } => {
            let start = Instant::now();
            let data_dir = data_dir.unwrap_or(config.seed.data_dir);
            let seeder = Seeder::new(db, data_dir);
            let mut progress = ConsoleProgress::new();

            let report = if force {
                seeder.reseed(&mut progress)?
            } else {
                seeder.seed(&mut progress)?
            };

            if report.skipped {
                eprintln!("Database already seeded; use --force to reload");
            } else {
                eprintln!(
                    "\nLoaded {} records from {:?} in {:.1}s",
                    report.total_rows(),
                    seeder.data_dir(),
                    start.elapsed().as_secs_f64()
                );
            }
        }

        command => print_json(&dispatch(&command, &services)?)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
