use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};
use crate::{MlErr, Result};

/// Hyperparameters of a [`GradientBoostingModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub tree: TreeParams,
}

impl Default for GradientBoostingParams {
    /// 100 rounds of 31-leaf trees with at least 20 samples per leaf, shrunk by 0.1.
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            tree: TreeParams {
                max_depth: None,
                max_leaves: Some(31),
                min_samples_split: 2,
                min_samples_leaf: 20,
            },
        }
    }
}

/// Gradient boosted regression trees under squared error.
///
/// Each round fits a leaf-wise tree to the residuals of the current ensemble and adds it,
/// shrunk by the learning rate. The ensemble starts from the mean target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    base_score: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostingModel {
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        params: &GradientBoostingParams,
    ) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(MlErr::SizeMismatch {
                a: "x",
                b: "y",
                got: x.nrows(),
                expected: y.len(),
            });
        }
        let base_score = y.mean().ok_or(MlErr::EmptyDataset)?;

        let rows: Vec<usize> = (0..x.nrows()).collect();
        let mut pred = Array1::from_elem(y.len(), base_score);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for round in 0..params.n_estimators {
            let residuals = &y - &pred;
            let mut tree = RegressionTree::fit(x, residuals.view(), rows.clone(), &params.tree);
            tree.scale(params.learning_rate);
            pred += &tree.predict(x);
            trees.push(tree);

            log::trace!("boosting round {round} done");
        }

        Ok(Self { base_score, trees })
    }

    /// Predicts the target of every row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        let mut pred = Array1::from_elem(x.nrows(), self.base_score);
        for tree in &self.trees {
            pred += &tree.predict(x);
        }
        pred
    }

    pub fn validate(&self, n_features: usize) -> Result<()> {
        if !self.base_score.is_finite() {
            return Err(MlErr::InvalidModel(format!(
                "non-finite base score {}",
                self.base_score
            )));
        }

        self.trees.iter().try_for_each(|t| t.validate(n_features))
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
