//! Immutable binary training set shared by every tree.

use crate::error::Id3Error;

/// Per-label counts over a set of examples: `counts[label]`.
pub type LabelCounts = [usize; 2];

/// A validated matrix of binary features with binary labels.
///
/// Rows are examples, columns are features. Trees never copy rows; they
/// pass example indices into this set around instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSet {
    features: Vec<Vec<u8>>,
    labels: Vec<u8>,
    n_features: usize,
}

impl TrainingSet {
    /// Build a training set from row-major features and labels.
    ///
    /// `features[example_idx][feature_idx]` must be 0 or 1, as must every label.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::EmptyDataset`] | `features` is empty |
    /// | [`Id3Error::ZeroFeatures`] | rows have zero feature columns |
    /// | [`Id3Error::LabelCountMismatch`] | `labels.len() != features.len()` |
    /// | [`Id3Error::FeatureCountMismatch`] | rows have inconsistent lengths |
    /// | [`Id3Error::NonBinaryValue`] | a feature value is not 0 or 1 |
    /// | [`Id3Error::NonBinaryLabel`] | a label is not 0 or 1 |
    pub fn new(features: Vec<Vec<u8>>, labels: Vec<u8>) -> Result<Self, Id3Error> {
        if features.is_empty() {
            return Err(Id3Error::EmptyDataset);
        }
        let n_features = features[0].len();
        if n_features == 0 {
            return Err(Id3Error::ZeroFeatures);
        }
        if labels.len() != features.len() {
            return Err(Id3Error::LabelCountMismatch {
                n_examples: features.len(),
                n_labels: labels.len(),
            });
        }

        for (example_index, row) in features.iter().enumerate() {
            if row.len() != n_features {
                return Err(Id3Error::FeatureCountMismatch {
                    expected: n_features,
                    got: row.len(),
                    example_index,
                });
            }
            if let Some((feature_index, &value)) = row.iter().enumerate().find(|(_, v)| **v > 1) {
                return Err(Id3Error::NonBinaryValue {
                    example_index,
                    feature_index,
                    value,
                });
            }
        }

        if let Some((example_index, &label)) = labels.iter().enumerate().find(|(_, l)| **l > 1) {
            return Err(Id3Error::NonBinaryLabel {
                example_index,
                label,
            });
        }

        Ok(Self {
            features,
            labels,
            n_features,
        })
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of examples.
    #[must_use]
    pub fn n_examples(&self) -> usize {
        self.labels.len()
    }

    /// Return the feature vector of one example.
    ///
    /// # Panics
    ///
    /// Panics if `example >= n_examples()`.
    #[must_use]
    pub fn features(&self, example: usize) -> &[u8] {
        &self.features[example]
    }

    /// Return the label of one example.
    ///
    /// # Panics
    ///
    /// Panics if `example >= n_examples()`.
    #[must_use]
    pub fn label(&self, example: usize) -> u8 {
        self.labels[example]
    }

    /// Return the value of `feature` for `example`.
    #[must_use]
    pub fn value(&self, example: usize, feature: usize) -> u8 {
        self.features[example][feature]
    }

    /// Return every feature row.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.features
    }

    /// Return every label.
    #[must_use]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Count labels over the given example indices.
    #[must_use]
    pub fn label_counts(&self, examples: &[usize]) -> LabelCounts {
        let mut counts = [0usize; 2];
        for &ex in examples {
            counts[usize::from(self.labels[ex])] += 1;
        }
        counts
    }

    /// Build a new training set holding only the listed examples, in order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Id3Error::EmptyDataset`] | `examples` is empty |
    /// | [`Id3Error::ExampleOutOfRange`] | an index is `>= n_examples()` |
    pub fn subset(&self, examples: &[usize]) -> Result<Self, Id3Error> {
        if examples.is_empty() {
            return Err(Id3Error::EmptyDataset);
        }
        let mut features = Vec::with_capacity(examples.len());
        let mut labels = Vec::with_capacity(examples.len());
        for &ex in examples {
            if ex >= self.n_examples() {
                return Err(Id3Error::ExampleOutOfRange {
                    example: ex,
                    n_examples: self.n_examples(),
                });
            }
            features.push(self.features[ex].clone());
            labels.push(self.labels[ex]);
        }
        Ok(Self {
            features,
            labels,
            n_features: self.n_features,
        })
    }
}

/// Majority label of a count pair; ties resolve to 0.
#[must_use]
pub fn majority_label(counts: LabelCounts) -> u8 {
    u8::from(counts[1] > counts[0])
}
