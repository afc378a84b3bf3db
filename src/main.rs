use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use bitforest_id3::{
    Classifier, DecisionForestConfig, ExampleSampling, Holdout, Model, TrainingSet, evaluate,
    train,
};
use bitforest_io::{BinaryCsvReader, DatasetStem, ResultWriter, write_predictions};

#[derive(Parser)]
#[command(name = "bitforest")]
#[command(about = "ID3 decision trees and random-subspace forests over binary features")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Model selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// Dataset stem: reads `<stem>.train.csv` (and `<stem>.test.csv` for predict)
    #[arg(long)]
    data: PathBuf,

    /// Number of trees in the forest (a single tree if not set)
    #[arg(long)]
    trees: Option<usize>,

    /// Train each forest tree on its drawn example subset as well
    #[arg(long, default_value_t = false)]
    bagging: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Train on the leading examples and score the held-out tail
    Evaluate {
        #[command(flatten)]
        model: ModelArgs,

        /// Fraction of training examples held out for validation
        #[arg(long, default_value_t = 0.25)]
        holdout: f64,

        /// Output directory for the evaluation JSON (not written if not set)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Train on every example and label the test file
    Predict {
        #[command(flatten)]
        model: ModelArgs,

        /// Path of the `row,prediction` CSV to write
        #[arg(long)]
        output: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct EvaluateOutput {
    dataset: String,
    model: &'static str,
    n_trees: usize,
    n_features: usize,
    n_train: usize,
    n_validation: usize,
    accuracy: Option<f64>,
    accuracy_percent: Option<usize>,
    confusion_matrix: Option<[[usize; 2]; 2]>,
}

#[derive(Serialize)]
struct PredictOutput {
    dataset: String,
    model: &'static str,
    n_trees: usize,
    n_features: usize,
    n_predictions: usize,
    n_positive: usize,
    output: PathBuf,
}

fn fit_model(set: &TrainingSet, args: &ModelArgs, seed: u64) -> Result<Model> {
    if args.bagging && args.trees.is_none() {
        anyhow::bail!("--bagging requires --trees");
    }
    let model = match args.trees {
        Some(n_trees) if args.bagging => Model::Forest(
            DecisionForestConfig::new(n_trees)?
                .with_seed(seed)
                .with_example_sampling(ExampleSampling::Subset)
                .fit(set)?,
        ),
        trees => train(set, trees, seed)?,
    };
    Ok(model)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Evaluate {
            model: model_args,
            holdout,
            output_dir,
        } => {
            let stem = DatasetStem::new(model_args.data.clone());

            // 1. Read training data
            let dataset = BinaryCsvReader::new(&stem.train_path())
                .read_labeled()
                .context("failed to read training CSV")?;

            // 2. Split off the validation tail
            let split = Holdout::new(holdout)?
                .split(&dataset.training_set)
                .context("failed to split training data")?;
            let n_validation = split.validation.as_ref().map_or(0, TrainingSet::n_examples);
            info!(
                n_train = split.train.n_examples(),
                n_validation, "hold-out split"
            );

            // 3. Train
            let model = fit_model(&split.train, &model_args, cli.seed)
                .context("training failed")?;

            // 4. Score
            let evaluation = split
                .validation
                .as_ref()
                .map(|validation| evaluate(&model, validation))
                .transpose()
                .context("evaluation failed")?;

            // 5. Optionally write evaluation JSON
            if let Some(dir) = output_dir {
                let writer = ResultWriter::new(&dir, &stem.name())?;
                writer.write_evaluation(
                    model.kind(),
                    model_args.trees,
                    cli.seed,
                    split.train.n_examples(),
                    evaluation.as_ref(),
                    &dataset.feature_names,
                    &model.feature_importances(),
                )?;
            }

            // 6. Print summary
            let output = EvaluateOutput {
                dataset: stem.name(),
                model: model.kind(),
                n_trees: model.n_trees(),
                n_features: model.n_features(),
                n_train: split.train.n_examples(),
                n_validation,
                accuracy: evaluation.as_ref().map(|e| e.accuracy),
                accuracy_percent: evaluation.as_ref().map(|e| e.accuracy_percent()),
                confusion_matrix: evaluation.as_ref().map(|e| *e.confusion_matrix.as_rows()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Predict {
            model: model_args,
            output,
        } => {
            let stem = DatasetStem::new(model_args.data.clone());

            // 1. Read training and test data
            let dataset = BinaryCsvReader::new(&stem.train_path())
                .read_labeled()
                .context("failed to read training CSV")?;
            let test = BinaryCsvReader::new(&stem.test_path())
                .read_unlabeled(Some(dataset.training_set.n_features()))
                .context("failed to read test CSV")?;

            // 2. Train on everything
            let model = fit_model(&dataset.training_set, &model_args, cli.seed)
                .context("training failed")?;

            // 3. Predict
            let predictions = model
                .predict_batch(&test.rows)
                .context("prediction failed")?;

            // 4. Write predictions CSV
            write_predictions(&output, &predictions)?;

            // 5. Print summary
            let summary = PredictOutput {
                dataset: stem.name(),
                model: model.kind(),
                n_trees: model.n_trees(),
                n_features: model.n_features(),
                n_predictions: predictions.len(),
                n_positive: predictions.iter().filter(|&&p| p == 1).count(),
                output,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
