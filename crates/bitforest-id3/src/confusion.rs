//! Binary confusion matrix and label-1 metrics.

use std::fmt;

/// A 2x2 confusion matrix.
///
/// Entry `rows[true_label][predicted_label]` counts how many examples with
/// true label `true_label` were predicted as `predicted_label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    rows: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    /// Build a confusion matrix from true and predicted labels.
    ///
    /// Both slices must have the same length; this is checked in debug
    /// builds. Any non-zero label counts as 1.
    #[must_use]
    pub fn from_labels(true_labels: &[u8], predicted: &[u8]) -> Self {
        debug_assert_eq!(
            true_labels.len(),
            predicted.len(),
            "label and prediction counts differ"
        );
        let mut rows = [[0usize; 2]; 2];
        for (&t, &p) in true_labels.iter().zip(predicted) {
            rows[usize::from(t != 0)][usize::from(p != 0)] += 1;
        }
        Self { rows }
    }

    /// Total number of examples counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().flatten().sum()
    }

    /// Number of correct predictions.
    #[must_use]
    pub fn correct(&self) -> usize {
        self.rows[0][0] + self.rows[1][1]
    }

    /// Overall accuracy: proportion of correct predictions, 0.0 when empty.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.correct() as f64 / total as f64
        }
    }

    /// Precision of label 1: TP / (TP + FP). 0.0 if label 1 was never predicted.
    #[must_use]
    pub fn precision(&self) -> f64 {
        let tp = self.rows[1][1];
        let fp = self.rows[0][1];
        if tp + fp == 0 {
            0.0
        } else {
            tp as f64 / (tp + fp) as f64
        }
    }

    /// Recall of label 1: TP / (TP + FN). 0.0 if label 1 never occurs.
    #[must_use]
    pub fn recall(&self) -> f64 {
        let tp = self.rows[1][1];
        let fn_ = self.rows[1][0];
        if tp + fn_ == 0 {
            0.0
        } else {
            tp as f64 / (tp + fn_) as f64
        }
    }

    /// F1 of label 1. 0.0 if precision and recall are both zero.
    #[must_use]
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[[usize; 2]; 2] {
        &self.rows
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "true\\pred\t0\t1")?;
        for (label, row) in self.rows.iter().enumerate() {
            writeln!(f, "{label}\t\t{}\t{}", row[0], row[1])?;
        }
        Ok(())
    }
}
