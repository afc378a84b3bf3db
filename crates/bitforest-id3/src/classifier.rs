//! Common prediction interface for trees and forests.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{info, instrument};

use crate::config::DecisionForestConfig;
use crate::dataset::TrainingSet;
use crate::error::Id3Error;
use crate::forest::DecisionForest;
use crate::tree::{DecisionTree, DecisionTreeConfig};

/// A trained binary classifier.
pub trait Classifier: Sync {
    /// Return the number of features each input must have.
    fn n_features(&self) -> usize;

    /// Predict the label (0 or 1) of one feature vector.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`Id3Error::PredictionFeatureMismatch`] | `sample.len() != n_features()` |
    /// | [`Id3Error::NonBinaryPredictionValue`] | a value is not 0 or 1 |
    fn predict(&self, sample: &[u8]) -> Result<u8, Id3Error>;

    /// Predict labels for a batch of feature vectors in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error any sample produces.
    fn predict_batch(&self, samples: &[Vec<u8>]) -> Result<Vec<u8>, Id3Error> {
        samples
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }
}

/// Check that a prediction input is a binary vector of the expected length.
pub(crate) fn check_sample(sample: &[u8], n_features: usize) -> Result<(), Id3Error> {
    if sample.len() != n_features {
        return Err(Id3Error::PredictionFeatureMismatch {
            expected: n_features,
            got: sample.len(),
        });
    }
    if let Some((feature_index, &value)) = sample.iter().enumerate().find(|(_, v)| **v > 1) {
        return Err(Id3Error::NonBinaryPredictionValue {
            feature_index,
            value,
        });
    }
    Ok(())
}

/// Either a single tree or a forest, as returned by [`train`].
#[derive(Debug, Clone)]
pub enum Model {
    /// One tree trained on every feature and example.
    Tree(DecisionTree),
    /// A majority-vote ensemble.
    Forest(DecisionForest),
}

impl Model {
    /// Return a short name for the model kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Tree(_) => "tree",
            Model::Forest(_) => "forest",
        }
    }

    /// Return the number of trees, 1 for a single tree.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        match self {
            Model::Tree(_) => 1,
            Model::Forest(forest) => forest.n_trees(),
        }
    }

    /// Return per-feature importances of the underlying model.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        match self {
            Model::Tree(tree) => tree.feature_importances(),
            Model::Forest(forest) => forest.feature_importances(),
        }
    }
}

impl Classifier for Model {
    fn n_features(&self) -> usize {
        match self {
            Model::Tree(tree) => tree.n_features(),
            Model::Forest(forest) => forest.n_features(),
        }
    }

    fn predict(&self, sample: &[u8]) -> Result<u8, Id3Error> {
        match self {
            Model::Tree(tree) => tree.predict(sample),
            Model::Forest(forest) => forest.predict(sample),
        }
    }
}

/// Train a single tree, or a forest of `forest_size` trees seeded by `seed`.
///
/// # Errors
///
/// | Variant | When |
/// |---|---|
/// | [`Id3Error::InvalidTreeCount`] | `forest_size` is `Some(0)` |
/// | [`Id3Error::TooFewFeatures`] | a forest is requested on fewer than 2 features |
#[instrument(skip_all, fields(n_examples = set.n_examples(), forest_size = ?forest_size))]
pub fn train(set: &TrainingSet, forest_size: Option<usize>, seed: u64) -> Result<Model, Id3Error> {
    let model = match forest_size {
        None => Model::Tree(DecisionTreeConfig::new().fit(set)?),
        Some(n_trees) => Model::Forest(
            DecisionForestConfig::new(n_trees)?
                .with_seed(seed)
                .fit(set)?,
        ),
    };
    info!(kind = model.kind(), "model trained");
    Ok(model)
}
