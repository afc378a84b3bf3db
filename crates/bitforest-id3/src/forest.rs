//! Forest training with parallel tree construction.

use std::collections::BTreeSet;

use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::{DecisionForestConfig, ExampleSampling};
use crate::dataset::TrainingSet;
use crate::error::Id3Error;
use crate::node::FeatureIndex;
use crate::tree::{DecisionTree, grow};

/// The feature and example subsets drawn for one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSubset {
    /// Features the tree was allowed to split on, ascending.
    pub features: Vec<usize>,
    /// Examples drawn for the tree, ascending.
    ///
    /// Under [`ExampleSampling::Full`] these are recorded only; the tree
    /// still trains on every example.
    pub examples: Vec<usize>,
}

/// A fitted majority-vote forest of ID3 trees.
#[derive(Debug, Clone)]
pub struct DecisionForest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) subsets: Vec<TreeSubset>,
    pub(crate) n_features: usize,
}

/// Draw a uniformly random subset of `0..n` of size `take` without replacement.
///
/// Shuffles the full index range and keeps a sorted prefix.
fn draw_prefix(n: usize, take: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(take);
    indices.sort_unstable();
    indices
}

/// Draw the feature and example subsets for one tree.
///
/// The feature count is uniform in `[1, n_features - 1]` and the example
/// count uniform in `[0, n_examples - 1]`.
fn draw_subset(n_features: usize, n_examples: usize, rng: &mut impl Rng) -> TreeSubset {
    let k = rng.gen_range(1..n_features);
    let m = rng.gen_range(0..n_examples);
    TreeSubset {
        features: draw_prefix(n_features, k, rng),
        examples: draw_prefix(n_examples, m, rng),
    }
}

/// Train the forest ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_examples = set.n_examples()))]
pub(crate) fn train(
    config: &DecisionForestConfig,
    set: &TrainingSet,
) -> Result<DecisionForest, Id3Error> {
    let n_features = set.n_features();
    let n_examples = set.n_examples();
    if n_features < 2 {
        return Err(Id3Error::TooFewFeatures { n_features });
    }

    info!(
        n_trees = config.n_trees,
        n_examples,
        n_features,
        sampling = ?config.example_sampling,
        "training forest"
    );

    // One seed per tree from the master RNG, so each tree owns its stream.
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();
    let all_examples: Vec<usize> = (0..n_examples).collect();
    let sampling = config.example_sampling;

    let results: Vec<(DecisionTree, TreeSubset)> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let subset = draw_subset(n_features, n_examples, &mut rng);
            let eligible: BTreeSet<FeatureIndex> =
                subset.features.iter().copied().map(FeatureIndex::new).collect();
            let examples = match sampling {
                ExampleSampling::Full => &all_examples,
                ExampleSampling::Subset => &subset.examples,
            };
            let tree = grow(set, eligible, examples);
            (tree, subset)
        })
        .collect();

    let (trees, subsets): (Vec<DecisionTree>, Vec<TreeSubset>) = results.into_iter().unzip();

    debug!(
        mean_nodes = trees.iter().map(DecisionTree::n_nodes).sum::<usize>() as f64 / trees.len() as f64,
        "tree training complete"
    );
    info!(n_trees = trees.len(), "forest training complete");

    Ok(DecisionForest {
        trees,
        subsets,
        n_features,
    })
}
