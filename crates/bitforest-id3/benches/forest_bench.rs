//! Criterion benchmarks for bitforest-id3: tree and forest training and prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bitforest_id3::{Classifier, DecisionForestConfig, DecisionTreeConfig, TrainingSet};

fn make_binary_classification(n_examples: usize, n_features: usize, seed: u64) -> TrainingSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n_examples);
    let mut labels = Vec::with_capacity(n_examples);
    for _ in 0..n_examples {
        let row: Vec<u8> = (0..n_features).map(|_| u8::from(rng.r#gen::<bool>())).collect();
        labels.push(row[0] & (row[1] | row[2]));
        rows.push(row);
    }
    TrainingSet::new(rows, labels).unwrap()
}

fn bench_tree_train(c: &mut Criterion) {
    let set = make_binary_classification(1000, 40, 42);
    let cfg = DecisionTreeConfig::new();

    c.bench_function("id3_tree_train_1000x40", |b| {
        b.iter(|| cfg.fit(&set).unwrap());
    });
}

fn bench_forest_train(c: &mut Criterion) {
    let set = make_binary_classification(1000, 40, 42);
    let cfg = DecisionForestConfig::new(50).unwrap().with_seed(42);

    c.bench_function("id3_forest_train_1000x40_50trees", |b| {
        b.iter(|| cfg.fit(&set).unwrap());
    });
}

fn bench_forest_predict_batch(c: &mut Criterion) {
    let set = make_binary_classification(1000, 40, 42);
    let forest = DecisionForestConfig::new(50)
        .unwrap()
        .with_seed(42)
        .fit(&set)
        .unwrap();

    c.bench_function("id3_forest_predict_batch_1000x40_50trees", |b| {
        b.iter(|| forest.predict_batch(set.rows()).unwrap());
    });
}

criterion_group!(benches, bench_tree_train, bench_forest_train, bench_forest_predict_batch);
criterion_main!(benches);
