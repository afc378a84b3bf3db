//! Majority-vote prediction for the forest ensemble.

use crate::classifier::{Classifier, check_sample};
use crate::error::Id3Error;
use crate::forest::{DecisionForest, TreeSubset};
use crate::tree::DecisionTree;

/// Per-label vote counts from every tree in a forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoteTally {
    /// Trees that predicted label 0.
    pub zero: usize,
    /// Trees that predicted label 1.
    pub one: usize,
}

impl VoteTally {
    /// Return the label with the most votes. Ties resolve to 0.
    #[must_use]
    pub fn winner(&self) -> u8 {
        u8::from(self.one > self.zero)
    }

    /// Return the total number of votes cast.
    #[must_use]
    pub fn total(&self) -> usize {
        self.zero + self.one
    }

    fn record(&mut self, label: u8) {
        if label == 0 {
            self.zero += 1;
        } else {
            self.one += 1;
        }
    }
}

impl DecisionForest {
    /// Predict the label for a single feature vector by unweighted majority vote.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`Id3Error::PredictionFeatureMismatch`] | `sample.len() != n_features` |
    /// | [`Id3Error::NonBinaryPredictionValue`] | a value is not 0 or 1 |
    pub fn predict(&self, sample: &[u8]) -> Result<u8, Id3Error> {
        Ok(self.votes(sample)?.winner())
    }

    /// Collect every tree's vote for a single feature vector.
    ///
    /// # Errors
    ///
    /// Same as [`DecisionForest::predict`].
    pub fn votes(&self, sample: &[u8]) -> Result<VoteTally, Id3Error> {
        check_sample(sample, self.n_features)?;
        let mut tally = VoteTally::default();
        for tree in &self.trees {
            tally.record(tree.predict_unchecked(sample));
        }
        Ok(tally)
    }

    /// Return the number of features this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the trees in construction order.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Return the subsets drawn for each tree, aligned with [`DecisionForest::trees`].
    #[must_use]
    pub fn subsets(&self) -> &[TreeSubset] {
        &self.subsets
    }

    /// Average the trees' feature importances.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for tree in &self.trees {
            for (total, imp) in totals.iter_mut().zip(tree.feature_importances()) {
                *total += imp;
            }
        }
        let n = self.trees.len() as f64;
        totals.iter_mut().for_each(|v| *v /= n);
        totals
    }
}

impl Classifier for DecisionForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, sample: &[u8]) -> Result<u8, Id3Error> {
        DecisionForest::predict(self, sample)
    }
}
