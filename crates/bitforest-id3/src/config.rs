//! Configuration builder for forest training.

use crate::dataset::TrainingSet;
use crate::error::Id3Error;
use crate::forest::DecisionForest;

/// How each tree uses the example subset drawn for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExampleSampling {
    /// Record the drawn subset but train every tree on all examples.
    #[default]
    Full,
    /// Train each tree only on its drawn subset (bagging without replacement).
    Subset,
}

/// Configuration for forest training.
///
/// Construct via [`DecisionForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter          | Default |
/// |--------------------|---------|
/// | `seed`             | 42      |
/// | `example_sampling` | `Full`  |
#[derive(Debug, Clone)]
pub struct DecisionForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) seed: u64,
    pub(crate) example_sampling: ExampleSampling,
}

impl DecisionForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, Id3Error> {
        if n_trees == 0 {
            return Err(Id3Error::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            seed: 42,
            example_sampling: ExampleSampling::Full,
        })
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set how trees use their drawn example subsets.
    #[must_use]
    pub fn with_example_sampling(mut self, example_sampling: ExampleSampling) -> Self {
        self.example_sampling = example_sampling;
        self
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the example sampling mode.
    #[must_use]
    pub fn example_sampling(&self) -> ExampleSampling {
        self.example_sampling
    }

    /// Train a forest on the provided training set.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`Id3Error::TooFewFeatures`] | the training set has fewer than 2 features |
    pub fn fit(&self, set: &TrainingSet) -> Result<DecisionForest, Id3Error> {
        crate::forest::train(self, set)
    }
}
