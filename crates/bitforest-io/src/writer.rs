//! JSON evaluation writer and CSV prediction writer.

use std::fs;
use std::path::{Path, PathBuf};

use bitforest_id3::Evaluation;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;

/// Writes evaluation results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{name}_evaluation.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    name: String,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and artifact name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), name = %name))]
    pub fn new(output_dir: &Path, name: &str) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            name: name.to_string(),
        })
    }

    /// Return the path [`ResultWriter::write_evaluation`] writes to.
    #[must_use]
    pub fn evaluation_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_evaluation.json", self.name))
    }

    /// Write evaluation results to `{name}_evaluation.json`.
    ///
    /// `evaluation` is `None` when the hold-out set was empty. Feature names
    /// and importances are zipped, so both should have one entry per feature.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`IoError::Serialize`] | the artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | the file cannot be written |
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip_all)]
    pub fn write_evaluation(
        &self,
        model: &str,
        n_trees: Option<usize>,
        seed: u64,
        n_train: usize,
        evaluation: Option<&Evaluation>,
        feature_names: &[String],
        feature_importances: &[f64],
    ) -> Result<(), IoError> {
        let path = self.evaluation_path();

        let features: Vec<FeatureEntry> = feature_names
            .iter()
            .zip(feature_importances)
            .map(|(name, &importance)| FeatureEntry {
                name: name.as_str(),
                importance,
            })
            .collect();

        let validation = evaluation.map(|e| ValidationEntry {
            n_examples: e.total,
            correct: e.correct,
            accuracy: e.accuracy,
            accuracy_percent: e.accuracy_percent(),
            precision: e.confusion_matrix.precision(),
            recall: e.confusion_matrix.recall(),
            f1: e.confusion_matrix.f1(),
            confusion_matrix: *e.confusion_matrix.as_rows(),
        });

        let artifact = EvaluateArtifact {
            dataset: &self.name,
            model,
            n_trees,
            seed,
            n_train,
            validation,
            feature_importances: features,
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "evaluation result written");
        Ok(())
    }
}

/// Write one `row,prediction` line per predicted label, with a header.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// | Variant | When |
/// |---|---|
/// | [`IoError::OutputDirCreate`] | the parent directory cannot be created |
/// | [`IoError::WriteCsv`] | the file cannot be created or written |
#[instrument(skip(predictions), fields(path = %path.display(), n = predictions.len()))]
pub fn write_predictions(path: &Path, predictions: &[u8]) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| IoError::OutputDirCreate {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let csv_error = |e: csv::Error| IoError::WriteCsv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
    for (row, &prediction) in predictions.iter().enumerate() {
        wtr.serialize(PredictionRow { row, prediction })
            .map_err(csv_error)?;
    }
    wtr.flush().map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("predictions written");
    Ok(())
}

// --- Shadow structs for serialization ---

#[derive(Serialize)]
struct EvaluateArtifact<'a> {
    dataset: &'a str,
    model: &'a str,
    n_trees: Option<usize>,
    seed: u64,
    n_train: usize,
    validation: Option<ValidationEntry>,
    feature_importances: Vec<FeatureEntry<'a>>,
}

#[derive(Serialize)]
struct ValidationEntry {
    n_examples: usize,
    correct: usize,
    accuracy: f64,
    accuracy_percent: usize,
    precision: f64,
    recall: f64,
    f1: f64,
    confusion_matrix: [[usize; 2]; 2],
}

#[derive(Serialize)]
struct FeatureEntry<'a> {
    name: &'a str,
    importance: f64,
}

#[derive(Serialize)]
struct PredictionRow {
    row: usize,
    prediction: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitforest_id3::{DecisionTreeConfig, TrainingSet, evaluate};
    use tempfile::TempDir;

    fn separable() -> TrainingSet {
        TrainingSet::new(
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
            vec![0, 0, 1, 1],
        )
        .unwrap()
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn write_evaluation_json_structure() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(dir.path(), "votes").unwrap();

        let set = separable();
        let tree = DecisionTreeConfig::new().fit(&set).unwrap();
        let evaluation = evaluate(&tree, &set).unwrap();
        let names = vec!["a".to_string(), "b".to_string()];

        writer
            .write_evaluation(
                "tree",
                None,
                42,
                4,
                Some(&evaluation),
                &names,
                &tree.feature_importances(),
            )
            .unwrap();

        let content = read_json(&dir.path().join("votes_evaluation.json"));
        assert_eq!(content["dataset"], "votes");
        assert_eq!(content["model"], "tree");
        assert!(content["n_trees"].is_null());
        assert_eq!(content["seed"], 42);
        assert_eq!(content["validation"]["accuracy_percent"], 100);
        assert_eq!(content["validation"]["confusion_matrix"][1][1], 2);
        let features = content["feature_importances"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["name"], "a");
        assert_eq!(features[0]["importance"], 1.0);
    }

    #[test]
    fn write_evaluation_without_validation() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(dir.path(), "tiny").unwrap();
        writer
            .write_evaluation("forest", Some(5), 1, 3, None, &[], &[])
            .unwrap();

        let content = read_json(&writer.evaluation_path());
        assert!(content["validation"].is_null());
        assert_eq!(content["n_trees"], 5);
    }

    #[test]
    fn writer_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("deep");
        let writer = ResultWriter::new(&nested, "n").unwrap();
        writer
            .write_evaluation("tree", None, 0, 1, None, &[], &[])
            .unwrap();
        assert!(nested.join("n_evaluation.json").exists());
    }

    #[test]
    fn write_predictions_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("predictions.csv");
        write_predictions(&path, &[1, 0, 1]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "row,prediction\n0,1\n1,0\n2,1\n");
    }
}
