//! The training pipeline, one function per stage.
//!
//! Only [`load`], [`visualize`] and [`persist`] touch the filesystem; every other stage is a
//! function of its inputs.

use std::path::{Path, PathBuf};

use log::info;
use machine_learning::{
    arch::Model,
    artifact::ModelArtifact,
    dataset::Dataset,
    selection::{self, Candidate, Evaluation},
    split::{Split, train_test_split},
    stats,
};

use crate::{Result, TrainerConfig, TrainerErr, plot, report};

/// A candidate after fitting.
#[derive(Debug, Clone)]
pub struct Fitted {
    pub name: String,
    pub model: Model,
}

/// What a pipeline run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// One score per candidate, in evaluation order.
    pub evaluations: Vec<Evaluation>,
    /// The selected candidate's score.
    pub best: Evaluation,
    pub plots: Vec<PathBuf>,
    pub artifact_path: PathBuf,
}

/// Reads the dataset.
pub fn load(config: &TrainerConfig) -> Result<Dataset> {
    info!("Loading the data from {}", config.data_path.display());
    let dataset = Dataset::load(&config.data_path, config.delimiter_byte())?;
    info!("loaded {} samples", dataset.len());
    Ok(dataset)
}

/// Renders the data snapshot and the per column statistics.
///
/// # Returns
/// The `(snapshot, statistics)` tables.
pub fn describe(dataset: &Dataset, head_rows: usize) -> (String, String) {
    let snapshot = report::format_rows(&dataset.head(head_rows));
    let statistics = report::format_summaries(&stats::describe(dataset));
    (snapshot, statistics)
}

/// Writes one scatter plot per feature into `figs_dir`, which must exist.
pub fn visualize(dataset: &Dataset, figs_dir: &Path) -> Result<Vec<PathBuf>> {
    info!("Generating scatter plots");
    plot::scatter_plots(dataset, figs_dir)
}

/// Partitions the dataset into train and test subsets.
pub fn split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<Split> {
    let split = train_test_split(dataset, test_size, seed)?;
    let shape = |d: &Dataset| d.features().dim();
    info!("Shape of train dataset: {:?}", shape(&split.train));
    info!("Shape of test dataset: {:?}", shape(&split.test));
    Ok(split)
}

/// Fits every candidate on the training partition, in order.
pub fn train(candidates: Vec<Candidate>, train: &Dataset) -> Result<Vec<Fitted>> {
    info!("Fitting the Models");
    candidates
        .into_iter()
        .map(|candidate| {
            info!("Training {}", candidate.name);
            let model = candidate
                .algorithm
                .fit(train.features(), train.targets())?;
            Ok(Fitted {
                name: candidate.name,
                model,
            })
        })
        .collect()
}

/// Scores every fitted model on the same test partition.
pub fn evaluate(fitted: &[Fitted], test: &Dataset) -> Vec<Evaluation> {
    fitted
        .iter()
        .map(|f| {
            let mse = selection::evaluate(&f.model, test);
            info!("{} MSE: {mse}", f.name);
            Evaluation {
                name: f.name.clone(),
                mse,
            }
        })
        .collect()
}

/// Picks the fitted model with the lowest error and wraps it into an artifact.
pub fn select(fitted: Vec<Fitted>, evaluations: &[Evaluation]) -> Result<ModelArtifact> {
    let idx = selection::select_best(evaluations).ok_or(TrainerErr::NoModelSelected)?;
    let best = &evaluations[idx];
    info!("Best Model: {} with MSE: {}", best.name, best.mse);

    let model = fitted
        .into_iter()
        .nth(idx)
        .ok_or(TrainerErr::NoModelSelected)?
        .model;
    Ok(ModelArtifact::new(best.name.clone(), best.mse, model))
}

/// Writes the selected model where the prediction service expects it.
pub fn persist(artifact: &ModelArtifact, path: &Path) -> Result<()> {
    artifact.save(path)?;
    info!("saved {} to {}", artifact.name, path.display());
    Ok(())
}

/// Runs every stage of the pipeline.
///
/// # Arguments
/// * `config` - Paths and split settings.
///
/// # Returns
/// A summary of the run or the first error any stage hit.
pub fn run(config: &TrainerConfig) -> Result<TrainingReport> {
    info!("Process started");
    config.validate()?;

    let dataset = load(config)?;

    let (snapshot, statistics) = describe(&dataset, config.head_rows);
    info!("Data snapshot\n{snapshot}");
    info!("Feature statistics\n{statistics}");

    let plots = visualize(&dataset, &config.figs_dir)?;

    info!("Building the Model");
    let partition = split(&dataset, config.test_size, config.seed)?;
    let fitted = train(selection::candidates(config.seed), &partition.train)?;
    let evaluations = evaluate(&fitted, &partition.test);
    let artifact = select(fitted, &evaluations)?;
    persist(&artifact, &config.artifact_path)?;

    info!("Process ended successfully");
    Ok(TrainingReport {
        best: Evaluation {
            name: artifact.name,
            mse: artifact.mse,
        },
        evaluations,
        plots,
        artifact_path: config.artifact_path.clone(),
    })
}
