//! CSV reader for binary datasets with full input validation.

use std::path::{Path, PathBuf};

use bitforest_id3::TrainingSet;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{LabeledDataset, UnlabeledDataset};

/// Name the last header column of a training file must carry.
pub const LABEL_COLUMN: &str = "label";

/// Reads binary feature data from a CSV file.
///
/// Expected CSV format:
/// - Header row required
/// - Training files: `f0,f1,...,fn,label`
/// - Test files: `f0,f1,...,fn`
/// - Every cell is `0` or `1`; surrounding whitespace is ignored
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::MissingLabelColumn`] | Training header does not end in `label` |
/// | [`IoError::NoFeatureColumns`] | Header has no feature columns |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonBinaryCell`] | Cell is not `0` or `1` |
/// | [`IoError::FeatureCountMismatch`] | Test file width differs from the expected feature count |
/// | [`IoError::InvalidDataset`] | Parsed training data fails validation |
pub struct BinaryCsvReader {
    path: PathBuf,
}

/// Header and parsed rows of one file.
struct RawTable {
    header: Vec<String>,
    rows: Vec<Vec<u8>>,
}

impl BinaryCsvReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read a labelled training file whose last column is `label`.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read_labeled(&self) -> Result<LabeledDataset, IoError> {
        let RawTable { mut header, rows } = self.read_table()?;

        let found = header.pop().unwrap_or_default();
        if found != LABEL_COLUMN {
            return Err(IoError::MissingLabelColumn {
                path: self.path.clone(),
                found,
            });
        }
        if header.is_empty() {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
            });
        }

        let mut features = Vec::with_capacity(rows.len());
        let mut labels = Vec::with_capacity(rows.len());
        for mut row in rows {
            // Row length was checked against the header, so pop always yields.
            labels.push(row.pop().unwrap_or_default());
            features.push(row);
        }

        let training_set =
            TrainingSet::new(features, labels).map_err(|e| IoError::InvalidDataset {
                path: self.path.clone(),
                source: e,
            })?;

        info!(
            n_examples = training_set.n_examples(),
            n_features = training_set.n_features(),
            "training data loaded"
        );

        Ok(LabeledDataset {
            feature_names: header,
            training_set,
        })
    }

    /// Read an unlabelled test file of feature columns only.
    ///
    /// When `expected_features` is given, the header must have exactly that
    /// many columns, otherwise [`IoError::FeatureCountMismatch`] is returned.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read_unlabeled(
        &self,
        expected_features: Option<usize>,
    ) -> Result<UnlabeledDataset, IoError> {
        let RawTable { header, rows } = self.read_table()?;
        if header.is_empty() {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
            });
        }
        if let Some(expected) = expected_features
            && expected != header.len()
        {
            return Err(IoError::FeatureCountMismatch {
                path: self.path.clone(),
                expected,
                got: header.len(),
            });
        }
        info!(n_examples = rows.len(), n_features = header.len(), "test data loaded");
        Ok(UnlabeledDataset {
            feature_names: header,
            rows,
        })
    }

    fn read_table(&self) -> Result<RawTable, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that our own InconsistentRowLength check fires
        // instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header: Vec<String> = rdr
            .headers()
            .map_err(|e| self.parse_error(e))?
            .iter()
            .map(str::to_string)
            .collect();
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.parse_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let row = record
                .iter()
                .enumerate()
                .map(|(col_index, raw)| match raw {
                    "0" => Ok(0u8),
                    "1" => Ok(1u8),
                    other => Err(IoError::NonBinaryCell {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: other.to_string(),
                    }),
                })
                .collect::<Result<Vec<u8>, IoError>>()?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        Ok(RawTable { header, rows })
    }

    fn parse_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
