pub mod csv_parser;
pub mod loader;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use csv_parser::{CSVParser, SourceRecord, SourceRecords};
pub use loader::{LoadOutcome, TableLoader};

/// How an insert resolves a clash with an existing row's identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Fail the statement, and with it the load.
    Abort,
    /// Drop the incoming row silently.
    #[default]
    Ignore,
    /// Overwrite the existing row with the incoming one.
    Replace,
}

impl ConflictPolicy {
    pub fn insert_verb(&self) -> &'static str {
        match self {
            ConflictPolicy::Abort => "INSERT OR ABORT",
            ConflictPolicy::Ignore => "INSERT OR IGNORE",
            ConflictPolicy::Replace => "INSERT OR REPLACE",
        }
    }
}

/// Where the insert column list comes from and how strictly rows must fit it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColumnMode {
    /// Source header as-is; the storage engine rejects unknown columns.
    Header,
    /// Source header checked against the relation's declared columns first.
    #[default]
    Destination,
    /// Like `Destination`, and every row must have as many fields as the header.
    Strict,
}
