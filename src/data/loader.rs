//! CSV table loading.
//!
//! Tables keep every source column and the verbatim cell text so the merged
//! export can reproduce the trade log as it was supplied.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::PipelineError;

/// An untyped table: header row plus data rows, all as text.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Parse a table from any byte stream.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> crate::error::Result<Self> {
        let csv_err = |source| PipelineError::Csv {
            table: name.to_string(),
            source,
        };

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = reader.headers().map_err(csv_err)?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record.map_err(csv_err)?);
        }

        debug!(table = name, columns = headers.len(), rows = rows.len(), "Loaded table");

        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    /// Open and parse a table from a file.
    pub fn from_path<P: AsRef<Path>>(name: &str, path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open {} file: {:?}", name, path.as_ref()))?;
        Self::from_reader(name, file)
            .with_context(|| format!("Failed to read {} file: {:?}", name, path.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column(&self, column: &str) -> crate::error::Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| PipelineError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SENTIMENT: &str = "timestamp,value,classification,date\n\
        1704067200,25,Fear,2024-01-01\n\
        1704153600,70,Greed,2024-01-02\n";

    #[test]
    fn test_preserves_all_columns() {
        let table = Table::from_reader("sentiment", SENTIMENT.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.headers().len(), 4);
        assert_eq!(table.column("date").unwrap(), 3);
        assert_eq!(&table.rows()[1][2], "Greed");
    }

    #[test]
    fn test_missing_column_is_reported() {
        let table = Table::from_reader("sentiment", SENTIMENT.as_bytes()).unwrap();

        match table.column("Date") {
            Err(PipelineError::MissingColumn { table, column }) => {
                assert_eq!(table, "sentiment");
                assert_eq!(column, "Date");
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let data = "a,b\n1,2\n3\n";
        let result = Table::from_reader("trades", data.as_bytes());
        assert!(matches!(result, Err(PipelineError::Csv { .. })));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SENTIMENT.as_bytes()).unwrap();

        let table = Table::from_path("sentiment", file.path()).unwrap();
        assert_eq!(table.name(), "sentiment");
        assert!(!table.is_empty());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = Table::from_path("trades", "/nonexistent/trades.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open trades file"));
    }
}
