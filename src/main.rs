// Main entry point for the CLI application

use clap::Parser;
use diet_etl::args::{Cli, Commands, ReportFormat};
use diet_etl::config::EtlConfig;
use diet_etl::refresh::Refresher;
use diet_etl::schema::SchemaInitializer;
use diet_etl::store::Store;
use log::{error, info, warn};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load or create configuration
    let config = if cli.config.exists() {
        match EtlConfig::load_from_file(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                init_logging("info", cli.verbose);
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        EtlConfig::default()
    };
    init_logging(&config.logging.level, cli.verbose);
    if !cli.config.exists() {
        warn!("Configuration file {} not found, using defaults", cli.config.display());
    }

    match run(cli, config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// RUST_LOG still wins over the configured level
fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn run(cli: Cli, mut config: EtlConfig) -> Result<bool, Box<dyn std::error::Error>> {
    if let Some(database) = cli.database {
        config.storage.database_path = database;
    }

    match cli.command {
        Commands::InitConfig { output } => {
            EtlConfig::default().save_to_file(&output)?;
            println!("Created default configuration at: {}", output.display());
            Ok(true)
        }

        Commands::Refresh { format } => {
            let store = Store::open(&config.storage.database_path)?;
            let report = Refresher::new(config).run(&store);

            // The connection is closed whatever the refresh reported
            close_store(store);

            match format {
                ReportFormat::Text => print!("{}", report),
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(report.is_success())
        }

        Commands::Load { file, relation, on_conflict, column_mode } => {
            let store = Store::open(&config.storage.database_path)?;
            let mut loader = config.to_loader();
            if let Some(policy) = on_conflict {
                loader = loader.with_conflict_policy(policy);
            }
            if let Some(mode) = column_mode {
                loader = loader.with_column_mode(mode);
            }

            let result = loader.load(&store, &file, &relation);
            close_store(store);

            let outcome = result?;
            println!("{}: {:?}", relation, outcome);
            Ok(true)
        }

        Commands::InitSchema => {
            let store = Store::open(&config.storage.database_path)?;
            let result = SchemaInitializer::new()
                .with_diet_chart_meals(config.schema.diet_chart_meals)
                .reset(&store);
            close_store(store);

            result?;
            println!("Schema created in {}", config.storage.database_path.display());
            Ok(true)
        }
    }
}

fn close_store(store: Store) {
    match store.close() {
        Ok(()) => info!("Closed the database connection."),
        Err(e) => error!("Closing the database failed: {}", e),
    }
}
