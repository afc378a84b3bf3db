//! I/O error types for bitforest-io.

use std::path::PathBuf;

use bitforest_id3::Id3Error;

/// Errors from dataset loading, validation, and result writing.
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

    /// Returned when a training file's last header column is not `label`.
    #[error("missing label column in {path}: last header column is \"{found}\"")]
    MissingLabelColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// The header found in the last column.
        found: String,
    },

    /// Returned when a header has no feature columns.
    #[error("no feature columns in {path}")]
    NoFeatureColumns {
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

    /// Returned when a cell is anything other than `0` or `1`.
    #[error("non-binary cell in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonBinaryCell {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index.
        col_index: usize,
        /// The raw cell text.
        raw: String,
    },

    /// Returned when a test file's feature count differs from the training file's.
    #[error("{path} has {got} feature columns, expected {expected}")]
    FeatureCountMismatch {
        /// Path to the CSV file.
        path: PathBuf,
        /// Feature count of the training data.
        expected: usize,
        /// Feature count found.
        got: usize,
    },

    /// Returned when parsed data fails training-set validation.
    #[error("invalid dataset in {path}")]
    InvalidDataset {
        /// Path to the CSV file.
        path: PathBuf,
        /// Underlying validation error.
        source: Id3Error,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a prediction CSV cannot be written.
    #[error("cannot write CSV {path}")]
    WriteCsv {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a result cannot be encoded as JSON.
    #[error("cannot serialize result for {path}")]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },
}
