//! ID3 decision trees and majority-vote forests over binary features.
//!
//! Trees split on the feature with the highest information gain, never
//! reusing a feature along a path. Forests train each tree on a random
//! feature subset (optionally a random example subset too) in parallel via
//! rayon, with one seeded RNG stream per tree, and predict by majority vote.

mod classifier;
mod config;
mod confusion;
mod dataset;
mod error;
mod eval;
mod forest;
mod node;
mod predict;
mod split;
mod tree;

pub use classifier::{Classifier, Model, train};
pub use config::{DecisionForestConfig, ExampleSampling};
pub use confusion::ConfusionMatrix;
pub use dataset::{LabelCounts, TrainingSet, majority_label};
pub use error::Id3Error;
pub use eval::{Evaluation, Holdout, HoldoutSplit, evaluate};
pub use forest::{DecisionForest, TreeSubset};
pub use node::{Entropy, FeatureIndex, Node, NodeIndex};
pub use predict::VoteTally;
pub use split::{entropy, information_gain};
pub use tree::{DecisionTree, DecisionTreeConfig};
