//! I/O error types for yieldcast-io.

use std::path::PathBuf;

/// Errors from file I/O, CSV parsing, cleaning, encoding, and report writing.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when an in-memory table row does not match its header width.
    #[error("row {row_index} has {got} cells, header has {expected}")]
    RaggedRow {
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Header width.
        expected: usize,
        /// Cells in this row.
        got: usize,
    },

    /// Returned when a required column is absent from the header.
    #[error("column \"{column}\" not found in header")]
    MissingColumn {
        /// The column that was looked up.
        column: String,
    },

    /// Returned when a row has no value in the label column.
    #[error("missing label at row {row_index}")]
    MissingLabel {
        /// Zero-based row index (excluding header).
        row_index: usize,
    },

    /// Returned when a label cell is not a recognized two-level value.
    #[error("unrecognized label \"{raw}\" at row {row_index}; expected 0/1, false/true, no/yes, or n/y")]
    InvalidLabel {
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// The raw cell contents.
        raw: String,
    },

    /// Returned when dropping columns leaves nothing to predict from.
    #[error("no predictor columns remain after dropping identifiers and the label")]
    NoPredictorColumns,

    /// Returned when every row has a missing predictor value.
    #[error("all {removed} rows have missing predictor values")]
    AllRowsRemoved {
        /// Number of rows removed.
        removed: usize,
    },

    /// Returned when the cleaned dataset contains only one outcome.
    #[error("every row has label {label}; two classes are required")]
    SingleClass {
        /// The only label present.
        label: usize,
    },

    /// Returned when a categorical level appears outside the rows the encoder was fitted on.
    #[error("level \"{level}\" of column \"{column}\" was not seen during training")]
    UnseenLevel {
        /// Column name.
        column: String,
        /// The unseen level.
        level: String,
    },

    /// Returned when a dataset's columns differ from those the encoder was fitted on.
    #[error("encoder fitted on {expected} columns, dataset has {got}")]
    ColumnMismatch {
        /// Columns the encoder knows.
        expected: usize,
        /// Columns in the dataset.
        got: usize,
    },

    /// Returned when a cell's kind differs from the column kind the encoder was fitted on.
    #[error("column \"{column}\" changed kind since the encoder was fitted")]
    KindMismatch {
        /// Column name.
        column: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a report cannot be serialized.
    #[error("cannot serialize report")]
    Serialize {
        /// Underlying serde_json error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
