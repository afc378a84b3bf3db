//! End-to-end integration tests: CSV -> train -> evaluate/predict -> JSON/CSV.

use std::fs;
use std::path::{Path, PathBuf};

use bitforest_id3::{Classifier, Holdout, evaluate, train};
use bitforest_io::{BinaryCsvReader, DatasetStem, IoError, ResultWriter, write_predictions};
use tempfile::TempDir;

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn evaluate_round_trip() {
    // 1. Read CSV
    let stem = DatasetStem::new(fixture_path("weather"));
    let dataset = BinaryCsvReader::new(&stem.train_path())
        .read_labeled()
        .expect("fixture should parse");
    assert_eq!(dataset.feature_names, vec!["outlook", "windy", "humid"]);
    assert_eq!(dataset.training_set.n_examples(), 8);

    // 2. Hold out the last quarter and train a single tree
    let split = Holdout::new(0.25)
        .unwrap()
        .split(&dataset.training_set)
        .unwrap();
    let model = train(&split.train, None, 42).unwrap();
    let validation = split.validation.expect("two validation rows");
    let evaluation = evaluate(&model, &validation).unwrap();
    assert_eq!(evaluation.total, 2);
    assert_eq!(evaluation.accuracy_percent(), 100);

    // 3. Write JSON artifact
    let dir = TempDir::new().unwrap();
    let writer = ResultWriter::new(dir.path(), &stem.name()).unwrap();
    writer
        .write_evaluation(
            model.kind(),
            None,
            42,
            split.train.n_examples(),
            Some(&evaluation),
            &dataset.feature_names,
            &model.feature_importances(),
        )
        .unwrap();

    // 4. Deserialize back and verify
    let json_path = dir.path().join("weather_evaluation.json");
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();

    assert_eq!(content["dataset"], "weather");
    assert_eq!(content["model"], "tree");
    assert_eq!(content["n_train"].as_u64().unwrap(), 6);
    assert_eq!(content["validation"]["n_examples"].as_u64().unwrap(), 2);
    assert_eq!(content["validation"]["accuracy"].as_f64().unwrap(), 1.0);

    // outlook decides the label on its own
    let features = content["feature_importances"].as_array().unwrap();
    assert_eq!(features[0]["name"], "outlook");
    assert_eq!(features[0]["importance"].as_f64().unwrap(), 1.0);
}

#[test]
fn predict_round_trip() {
    let stem = DatasetStem::new(fixture_path("weather"));
    let dataset = BinaryCsvReader::new(&stem.train_path())
        .read_labeled()
        .unwrap();
    let test = BinaryCsvReader::new(&stem.test_path())
        .read_unlabeled(Some(dataset.training_set.n_features()))
        .unwrap();

    let model = train(&dataset.training_set, None, 42).unwrap();
    let predictions = model.predict_batch(&test.rows).unwrap();
    assert_eq!(predictions, vec![1, 0, 1]);

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("weather_predictions.csv");
    write_predictions(&out, &predictions).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["row", "prediction"]);
    let rows: Vec<(usize, u8)> = rdr.deserialize().map(Result::unwrap).collect();
    assert_eq!(rows, vec![(0, 1), (1, 0), (2, 1)]);
}

#[test]
fn forest_predictions_are_binary_and_deterministic() {
    let stem = DatasetStem::new(fixture_path("weather"));
    let dataset = BinaryCsvReader::new(&stem.train_path())
        .read_labeled()
        .unwrap();
    let test = BinaryCsvReader::new(&stem.test_path())
        .read_unlabeled(Some(3))
        .unwrap();

    let a = train(&dataset.training_set, Some(9), 7).unwrap();
    let b = train(&dataset.training_set, Some(9), 7).unwrap();
    let pa = a.predict_batch(&test.rows).unwrap();
    let pb = b.predict_batch(&test.rows).unwrap();
    assert_eq!(pa, pb);
    assert!(pa.iter().all(|&p| p <= 1));
}

#[test]
fn reader_fixture_files_match_expected_errors() {
    // empty -> EmptyDataset
    let result = BinaryCsvReader::new(&fixture_path("empty.train.csv")).read_labeled();
    assert!(
        matches!(result, Err(IoError::EmptyDataset { .. })),
        "empty.train.csv should give EmptyDataset, got: {result:?}"
    );

    // jagged -> InconsistentRowLength
    let result = BinaryCsvReader::new(&fixture_path("jagged.train.csv")).read_labeled();
    assert!(
        matches!(result, Err(IoError::InconsistentRowLength { .. })),
        "jagged.train.csv should give InconsistentRowLength, got: {result:?}"
    );

    // nonbinary -> NonBinaryCell
    let result = BinaryCsvReader::new(&fixture_path("nonbinary.train.csv")).read_labeled();
    assert!(
        matches!(result, Err(IoError::NonBinaryCell { .. })),
        "nonbinary.train.csv should give NonBinaryCell, got: {result:?}"
    );

    // no label column -> MissingLabelColumn
    let result = BinaryCsvReader::new(&fixture_path("unlabeled.train.csv")).read_labeled();
    assert!(
        matches!(result, Err(IoError::MissingLabelColumn { .. })),
        "unlabeled.train.csv should give MissingLabelColumn, got: {result:?}"
    );

    // too few test columns -> FeatureCountMismatch
    let result = BinaryCsvReader::new(&fixture_path("narrow.test.csv")).read_unlabeled(Some(3));
    assert!(
        matches!(result, Err(IoError::FeatureCountMismatch { .. })),
        "narrow.test.csv should give FeatureCountMismatch, got: {result:?}"
    );
}
