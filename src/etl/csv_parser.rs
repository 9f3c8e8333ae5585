use csv::{StringRecord, Trim};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{EtlError, LoadResult};

/// Reads a delimited source with a header row into memory.
///
/// Every record is buffered before the caller sees any of them, so memory
/// grows with the file. Source files are expected to hold thousands of
/// rows, not millions.
pub struct CSVParser {
    delimiter: u8,
    trim: bool,
}

/// One data row, positionally aligned with the header.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    line: u64,
    fields: StringRecord,
}

/// Parsed source file: header plus data rows in file order.
#[derive(Debug, Clone, Default)]
pub struct SourceRecords {
    headers: Vec<String>,
    records: Vec<SourceRecord>,
}

impl SourceRecord {
    /// Field at the header position `index`; `None` for a short row.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // 1-based line in the source file
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl SourceRecords {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[SourceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.iter()
    }

    /// Value of `column` in `record`, looked up by header name.
    pub fn value<'a>(&self, record: &'a SourceRecord, column: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|h| h == column)?;
        record.get(index)
    }
}

impl Default for CSVParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CSVParser {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            trim: false,
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

    pub fn parse_path(&self, path: &Path) -> LoadResult<SourceRecords> {
        let file = File::open(path).map_err(|e| EtlError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_records(file, path)
    }

    pub fn parse_records<R: Read>(&self, reader: R, path: &Path) -> LoadResult<SourceRecords> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .from_reader(reader);

        let to_error = |e: csv::Error| EtlError::Csv {
            path: path.to_path_buf(),
            source: e,
        };

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(to_error)?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let fields = result.map_err(to_error)?;
            let line = fields.position().map(|p| p.line()).unwrap_or(0);
            records.push(SourceRecord { line, fields });
        }

        debug!("Parsed {} records from {}", records.len(), path.display());
        Ok(SourceRecords { headers, records })
    }
}
