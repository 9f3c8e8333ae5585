use log::{debug, info, warn};
use rusqlite::params_from_iter;
use serde::Serialize;
use std::path::Path;

use crate::etl::csv_parser::{CSVParser, SourceRecord, SourceRecords};
use crate::etl::{ColumnMode, ConflictPolicy};
use crate::store::Store;
use crate::{quote_ident, EtlError, LoadResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// No data rows; the relation was not touched.
    Empty,
    /// Every row was submitted. Rows dropped by the conflict policy are not
    /// told apart from stored ones.
    Loaded {
        rows_submitted: usize,
        columns: Vec<String>,
    },
}

/// Loads one delimited file into one existing relation.
pub struct TableLoader {
    delimiter: u8,
    trim: bool,
    batch_size: usize,
    conflict: ConflictPolicy,
    column_mode: ColumnMode,
    empty_as_null: bool,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableLoader {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            trim: false,
            batch_size: 1000,
            conflict: ConflictPolicy::Ignore,
            column_mode: ColumnMode::Destination,
            empty_as_null: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_conflict_policy(mut self, conflict: ConflictPolicy) -> Self {
        self.conflict = conflict;
        self
    }

    pub fn with_column_mode(mut self, column_mode: ColumnMode) -> Self {
        self.column_mode = column_mode;
        self
    }

    pub fn with_empty_as_null(mut self, empty_as_null: bool) -> Self {
        self.empty_as_null = empty_as_null;
        self
    }

    /// Reads `file_path` completely, then inserts its rows into `relation`
    /// in file order. Rows already written when a later row fails stay in
    /// the relation.
    pub fn load<P: AsRef<Path>>(
        &self,
        store: &Store,
        file_path: P,
        relation: &str,
    ) -> LoadResult<LoadOutcome> {
        let path = file_path.as_ref();
        let parser = CSVParser::new()
            .with_delimiter(self.delimiter)
            .with_trim(self.trim);
        let source = parser.parse_path(path)?;

        if source.is_empty() {
            info!("No records in {}, {} left empty", path.display(), relation);
            return Ok(LoadOutcome::Empty);
        }

        self.check_columns(store, path, relation, &source)?;

        let columns = source.headers().to_vec();
        let sql = self.insert_sql(relation, &columns);
        debug!("Prepared insert for {}: {}", relation, sql);

        let rows_submitted = self.insert_all(store, &sql, &source)?;
        info!("Data from {} loaded into {}", path.display(), relation);

        Ok(LoadOutcome::Loaded {
            rows_submitted,
            columns,
        })
    }

    pub fn insert_sql(&self, relation: &str, columns: &[String]) -> String {
        let column_list: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "{} INTO {} ({}) VALUES ({})",
            self.conflict.insert_verb(),
            quote_ident(relation),
            column_list.join(","),
            placeholders.join(",")
        )
    }

    fn check_columns(
        &self,
        store: &Store,
        path: &Path,
        relation: &str,
        source: &SourceRecords,
    ) -> LoadResult<()> {
        if self.column_mode == ColumnMode::Header {
            return Ok(());
        }

        let mut repeated: Vec<String> = Vec::new();
        for (i, header) in source.headers().iter().enumerate() {
            if source.headers()[..i].contains(header) && !repeated.contains(header) {
                repeated.push(header.clone());
            }
        }
        if !repeated.is_empty() {
            return Err(EtlError::DuplicateColumns {
                relation: relation.to_string(),
                columns: repeated,
            });
        }

        let declared = store
            .declared_columns(relation)?
            .ok_or_else(|| EtlError::UnknownRelation(relation.to_string()))?;
        let unknown: Vec<String> = source
            .headers()
            .iter()
            .filter(|h| !declared.contains(h))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(EtlError::UnknownColumns {
                relation: relation.to_string(),
                columns: unknown,
            });
        }

        if self.column_mode == ColumnMode::Strict {
            let expected = source.headers().len();
            if let Some(record) = source.iter().find(|r| r.len() != expected) {
                return Err(EtlError::RecordShape {
                    path: path.to_path_buf(),
                    line: record.line(),
                    expected,
                    found: record.len(),
                });
            }
        }

        Ok(())
    }

    fn insert_all(&self, store: &Store, sql: &str, source: &SourceRecords) -> LoadResult<usize> {
        let width = source.headers().len();
        let mut conn = store.lock();

        // Column mismatches surface here, before any row is written
        conn.prepare_cached(sql)?;

        let mut submitted = 0;
        for chunk in source.records().chunks(self.batch_size) {
            let tx = conn.transaction()?;
            let result: rusqlite::Result<()> = {
                let mut stmt = tx.prepare_cached(sql)?;
                chunk.iter().try_for_each(|record| {
                    stmt.execute(params_from_iter(self.row_values(record, width)))?;
                    submitted += 1;
                    Ok(())
                })
            };

            if let Err(e) = result {
                // Keep the rows of this batch that went in before the failure
                if let Err(commit_err) = tx.commit() {
                    warn!("Could not commit partial batch: {}", commit_err);
                }
                return Err(e.into());
            }
            tx.commit()?;
        }

        Ok(submitted)
    }

    fn row_values<'a>(&self, record: &'a SourceRecord, width: usize) -> Vec<Option<&'a str>> {
        (0..width)
            .map(|i| match record.get(i) {
                Some("") if self.empty_as_null => None,
                value => value,
            })
            .collect()
    }
}
