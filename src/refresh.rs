//! Full refresh: schema reset followed by one load per configured source.

use log::{error, info, warn};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{EtlConfig, OnLoadFailure};
use crate::etl::LoadOutcome;
use crate::schema::SchemaInitializer;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded { rows_submitted: usize },
    Empty,
    Failed { error: String },
    // Not attempted because an earlier load failed
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub file: PathBuf,
    pub relation: String,
    #[serde(flatten)]
    pub status: SourceStatus,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationCount {
    pub relation: String,
    pub rows: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    pub schema_error: Option<String>,
    pub sources: Vec<SourceReport>,
    pub row_counts: Vec<RelationCount>,
}

impl RefreshReport {
    pub fn is_success(&self) -> bool {
        self.schema_error.is_none()
            && self
                .sources
                .iter()
                .all(|s| matches!(s.status, SourceStatus::Loaded { .. } | SourceStatus::Empty))
    }

    pub fn failures(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources
            .iter()
            .filter(|s| matches!(s.status, SourceStatus::Failed { .. }))
    }

    pub fn rows_in(&self, relation: &str) -> Option<u64> {
        self.row_counts
            .iter()
            .find(|c| c.relation == relation)
            .map(|c| c.rows)
    }
}

impl fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(e) = &self.schema_error {
            writeln!(f, "Schema reset failed: {}", e)?;
        }
        for source in &self.sources {
            let status = match &source.status {
                SourceStatus::Loaded { rows_submitted } => format!("{} rows submitted", rows_submitted),
                SourceStatus::Empty => "no records".to_string(),
                SourceStatus::Failed { error } => format!("FAILED: {}", error),
                SourceStatus::Skipped => "skipped".to_string(),
            };
            writeln!(
                f,
                "{} -> {}: {} ({} ms)",
                source.file.display(),
                source.relation,
                status,
                source.elapsed_ms
            )?;
        }
        for count in &self.row_counts {
            writeln!(f, "{}: {} rows", count.relation, count.rows)?;
        }
        Ok(())
    }
}

pub struct Refresher {
    config: EtlConfig,
}

impl Refresher {
    pub fn new(config: EtlConfig) -> Self {
        Self { config }
    }

    pub fn schema(&self) -> SchemaInitializer {
        SchemaInitializer::new().with_diet_chart_meals(self.config.schema.diet_chart_meals)
    }

    /// Drops and recreates every relation, then loads each source in order.
    /// Failures end up in the report; nothing here closes the store.
    pub fn run(&self, store: &Store) -> RefreshReport {
        let mut report = RefreshReport::default();
        let schema = self.schema();

        if let Err(e) = schema.reset(store) {
            error!("Schema reset failed: {}", e);
            report.schema_error = Some(e.to_string());
            return report;
        }

        let loader = self.config.to_loader();
        let mut stopped = false;

        for source in &self.config.sources {
            let path = self.config.resolve_source(&source.file);

            if stopped {
                warn!("Skipping {} after an earlier failure", path.display());
                report.sources.push(SourceReport {
                    file: path,
                    relation: source.relation.clone(),
                    status: SourceStatus::Skipped,
                    elapsed_ms: 0,
                });
                continue;
            }

            let start = Instant::now();
            let status = match loader.load(store, &path, &source.relation) {
                Ok(LoadOutcome::Loaded { rows_submitted, .. }) => SourceStatus::Loaded { rows_submitted },
                Ok(LoadOutcome::Empty) => SourceStatus::Empty,
                Err(e) => {
                    error!("Loading {} into {} failed: {}", path.display(), source.relation, e);
                    stopped = self.config.etl.on_load_failure == OnLoadFailure::Stop;
                    SourceStatus::Failed { error: e.to_string() }
                }
            };

            report.sources.push(SourceReport {
                file: path,
                relation: source.relation.clone(),
                status,
                elapsed_ms: start.elapsed().as_millis() as u64,
            });
        }

        for table in schema.tables() {
            match store.row_count(table.name) {
                Ok(rows) => report.row_counts.push(RelationCount {
                    relation: table.name.to_string(),
                    rows,
                }),
                Err(e) => warn!("Could not count rows in {}: {}", table.name, e),
            }
        }

        info!(
            "Refresh finished: {} source(s), {} failure(s)",
            report.sources.len(),
            report.failures().count()
        );
        report
    }
}
