//! Error types for the sentiment/trade pipeline.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a dashboard run.
///
/// Every variant is fatal for the run: no partial report is produced.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// CSV framing error while reading an input table.
    #[error("CSV error in {table} input: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("{table} input is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    /// A cell could not be parsed into its typed value.
    #[error("{table} input row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    /// More than one sentiment classification was given for the same date.
    #[error("sentiment input has more than one classification for {0}")]
    DuplicateSentimentDate(NaiveDate),

    /// A classification needed for the comparisons is absent from the joined data.
    #[error("classification '{0}' not present in the joined data")]
    MissingClassification(String),

    /// Writing the merged export failed.
    #[error("failed to write merged export: {0}")]
    Export(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
