pub mod args;
pub mod config;
pub mod etl;
pub mod refresh;
pub mod schema;
pub mod store;

use std::path::PathBuf;

pub use args::{Cli, Commands};
pub use config::EtlConfig;
pub use etl::{ConflictPolicy, ColumnMode, LoadOutcome, TableLoader};
pub use refresh::{RefreshReport, Refresher};
pub use store::Store;

#[derive(Debug)]
pub enum EtlError {
    Io { path: PathBuf, source: std::io::Error },
    Csv { path: PathBuf, source: csv::Error },
    Sqlite(rusqlite::Error),
    UnknownRelation(String),
    UnknownColumns { relation: String, columns: Vec<String> },
    DuplicateColumns { relation: String, columns: Vec<String> },
    RecordShape { path: PathBuf, line: u64, expected: usize, found: usize },
    Config(String),
}

impl std::fmt::Display for EtlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EtlError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            EtlError::Csv { path, source } => {
                write!(f, "CSV parsing error in {}: {}", path.display(), source)
            }
            EtlError::Sqlite(e) => write!(f, "Storage error: {}", e),
            EtlError::UnknownRelation(name) => write!(f, "Relation not found: {}", name),
            EtlError::UnknownColumns { relation, columns } => write!(
                f,
                "Relation {} has no column(s): {}",
                relation,
                columns.join(", ")
            ),
            EtlError::DuplicateColumns { relation, columns } => write!(
                f,
                "Header for {} repeats column(s): {}",
                relation,
                columns.join(", ")
            ),
            EtlError::RecordShape { path, line, expected, found } => write!(
                f,
                "Record at {}:{} has {} field(s), header has {}",
                path.display(),
                line,
                found,
                expected
            ),
            EtlError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for EtlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EtlError::Io { source, .. } => Some(source),
            EtlError::Csv { source, .. } => Some(source),
            EtlError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for EtlError {
    fn from(e: rusqlite::Error) -> Self {
        EtlError::Sqlite(e)
    }
}

// Result type for load operations
pub type LoadResult<T> = Result<T, EtlError>;

/// Quotes an identifier for SQLite, doubling any embedded quote.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
