//! Domain types for bitforest-io.

use std::path::PathBuf;

use bitforest_id3::TrainingSet;

/// A dataset file stem such as `data/votes`.
///
/// Training rows live in `{stem}.train.csv` and unlabelled test rows in
/// `{stem}.test.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetStem(PathBuf);

impl DatasetStem {
    /// Wrap a stem path.
    pub fn new(stem: impl Into<PathBuf>) -> Self {
        Self(stem.into())
    }

    /// Path of the labelled training file.
    #[must_use]
    pub fn train_path(&self) -> PathBuf {
        self.with_suffix(".train.csv")
    }

    /// Path of the unlabelled test file.
    #[must_use]
    pub fn test_path(&self) -> PathBuf {
        self.with_suffix(".test.csv")
    }

    /// Final path component of the stem, used to name output artifacts.
    #[must_use]
    pub fn name(&self) -> String {
        self.0
            .file_name()
            .map_or_else(|| "dataset".to_string(), |n| n.to_string_lossy().into_owned())
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut raw = self.0.clone().into_os_string();
        raw.push(suffix);
        PathBuf::from(raw)
    }
}

/// A labelled binary dataset read from a training file.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    /// Feature column names from the CSV header.
    pub feature_names: Vec<String>,
    /// Validated features and labels.
    pub training_set: TrainingSet,
}

/// Unlabelled binary feature rows read from a test file.
#[derive(Debug, Clone)]
pub struct UnlabeledDataset {
    /// Feature column names from the CSV header.
    pub feature_names: Vec<String>,
    /// Feature values: `rows[example][feature]`, each 0 or 1.
    pub rows: Vec<Vec<u8>>,
}

impl UnlabeledDataset {
    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}
