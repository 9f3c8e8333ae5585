use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::etl::{ColumnMode, ConflictPolicy};

#[derive(Parser)]
#[command(name = "diet-etl")]
#[command(about = "Rebuilds the diet-planning SQLite database from CSV exports.")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    // Configuration file path
    #[arg(short, long, default_value = "diet-etl.yaml")]
    pub config: PathBuf,

    // Database file, overrides storage.database_path
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    // Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    // Drop, recreate and reload every configured relation
    Refresh {
        // Summary format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    // Load one CSV file into an existing relation
    Load {
        // Path to CSV file
        file: PathBuf,

        // Destination relation, e.g. Foods
        relation: String,

        // What to do with rows whose identity is already present
        #[arg(long, value_enum)]
        on_conflict: Option<ConflictPolicy>,

        // Where the column list comes from
        #[arg(long, value_enum)]
        column_mode: Option<ColumnMode>,
    },

    // Drop and recreate the relations without loading data
    InitSchema,

    // Generate default configuration file
    InitConfig {
        #[arg(short, long, default_value = "diet-etl.yaml")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}
