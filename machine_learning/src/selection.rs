use crate::{
    arch::{
        Algorithm, Model,
        loss::{LossFn, Mse},
        models::{GradientBoostingParams, RandomForestParams},
    },
    dataset::Dataset,
};

/// A named algorithm competing for the best model.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub algorithm: Algorithm,
}

/// The held-out score of a fitted candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub name: String,
    pub mse: f64,
}

impl Candidate {
    pub fn new(name: impl Into<String>, algorithm: Algorithm) -> Self {
        Self {
            name: name.into(),
            algorithm,
        }
    }
}

/// The three competing algorithms, in evaluation order.
///
/// # Arguments
/// * `seed` - Seed of the random forest's bootstrap sampling.
pub fn candidates(seed: u64) -> Vec<Candidate> {
    vec![
        Candidate::new("Linear Regression", Algorithm::LinearRegression),
        Candidate::new(
            "Gradient Boosting",
            Algorithm::GradientBoosting(GradientBoostingParams::default()),
        ),
        Candidate::new(
            "Random Forest",
            Algorithm::RandomForest(RandomForestParams {
                seed,
                ..RandomForestParams::default()
            }),
        ),
    ]
}

/// Mean squared error of `model` over `dataset`.
pub fn evaluate(model: &Model, dataset: &Dataset) -> f64 {
    let y_pred = model.predict(dataset.features());
    Mse.loss(y_pred.view(), dataset.targets())
}

/// Picks the evaluation with the lowest error.
///
/// Only a strictly lower error replaces the current best, so the first of several tied
/// evaluations wins. `NaN` errors never win.
///
/// # Returns
/// The index of the best evaluation, or `None` if there is none.
pub fn select_best(evaluations: &[Evaluation]) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_mse = f64::INFINITY;

    for (i, evaluation) in evaluations.iter().enumerate() {
        if evaluation.mse < best_mse {
            best_mse = evaluation.mse;
            best = Some(i);
        }
    }

    best
}
