//! Hold-out evaluation of a trained classifier.

use tracing::{info, instrument};

use crate::classifier::Classifier;
use crate::confusion::ConfusionMatrix;
use crate::dataset::TrainingSet;
use crate::error::Id3Error;

/// Splits a training set into a training part and a trailing validation part.
///
/// Construct via [`Holdout::new`].
#[derive(Debug, Clone, Copy)]
pub struct Holdout {
    fraction: f64,
}

/// The two halves produced by [`Holdout::split`].
#[derive(Debug, Clone)]
pub struct HoldoutSplit {
    /// Examples used for training.
    pub train: TrainingSet,
    /// Held-out examples, or `None` when the fraction rounds down to zero rows.
    pub validation: Option<TrainingSet>,
}

/// Result of scoring a classifier against labelled examples.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Fraction of correct predictions, 0.0 when there were no examples.
    pub accuracy: f64,
    /// Number of correct predictions.
    pub correct: usize,
    /// Number of examples scored.
    pub total: usize,
    /// Confusion matrix of the predictions.
    pub confusion_matrix: ConfusionMatrix,
}

impl Evaluation {
    /// Accuracy as a whole-number percentage, truncated.
    #[must_use]
    pub fn accuracy_percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            100 * self.correct / self.total
        }
    }
}

impl Holdout {
    /// Create a hold-out splitter keeping `fraction` of the examples for validation.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::InvalidHoldoutFraction`] unless `0.0 <= fraction < 1.0`.
    pub fn new(fraction: f64) -> Result<Self, Id3Error> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(Id3Error::InvalidHoldoutFraction { fraction });
        }
        Ok(Self { fraction })
    }

    /// Return the validation fraction.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Put the last `floor(n * fraction)` examples into the validation set.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::EmptyDataset`] if no examples would remain for training.
    pub fn split(&self, set: &TrainingSet) -> Result<HoldoutSplit, Id3Error> {
        let n = set.n_examples();
        let n_validation = (n as f64 * self.fraction).floor() as usize;
        let n_train = n - n_validation;
        if n_train == 0 {
            return Err(Id3Error::EmptyDataset);
        }
        let train_idx: Vec<usize> = (0..n_train).collect();
        let validation_idx: Vec<usize> = (n_train..n).collect();

        let validation = if validation_idx.is_empty() {
            None
        } else {
            Some(set.subset(&validation_idx)?)
        };
        Ok(HoldoutSplit {
            train: set.subset(&train_idx)?,
            validation,
        })
    }
}

/// Score a classifier against every example in `set`.
///
/// # Errors
///
/// Returns [`Id3Error::PredictionFeatureMismatch`] if the set's feature count
/// differs from the classifier's.
#[instrument(skip_all, fields(n_examples = set.n_examples()))]
pub fn evaluate<C: Classifier + ?Sized>(
    classifier: &C,
    set: &TrainingSet,
) -> Result<Evaluation, Id3Error> {
    let predicted = classifier.predict_batch(set.rows())?;
    let confusion_matrix = ConfusionMatrix::from_labels(set.labels(), &predicted);
    let evaluation = Evaluation {
        accuracy: confusion_matrix.accuracy(),
        correct: confusion_matrix.correct(),
        total: confusion_matrix.total(),
        confusion_matrix,
    };
    info!(
        correct = evaluation.correct,
        total = evaluation.total,
        accuracy = evaluation.accuracy,
        "evaluation complete"
    );
    Ok(evaluation)
}
