use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};
use crate::{MlErr, Result};

/// Hyperparameters of a [`RandomForestModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_estimators: usize,
    /// Whether each tree sees a bootstrap sample instead of every row.
    pub bootstrap: bool,
    pub seed: u64,
    pub tree: TreeParams,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            bootstrap: true,
            seed: 0,
            tree: TreeParams::default(),
        }
    }
}

/// An average of regression trees, each grown on its own bootstrap sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestModel {
    trees: Vec<RegressionTree>,
}

impl RandomForestModel {
    /// Grows every tree of the forest in parallel.
    ///
    /// Tree `i` draws its sample from a generator seeded with `seed + i`, so the forest only
    /// depends on the data and the seed, never on scheduling.
    ///
    /// # Arguments
    /// * `x` - The `(n, d)` feature matrix.
    /// * `y` - The `n` targets.
    /// * `params` - The forest's hyperparameters.
    ///
    /// # Returns
    /// The fitted forest or an error if there is nothing to fit.
    pub fn fit(x: ArrayView2<f64>, y: ArrayView1<f64>, params: &RandomForestParams) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(MlErr::SizeMismatch {
                a: "x",
                b: "y",
                got: x.nrows(),
                expected: y.len(),
            });
        }

        let n = y.len();
        if n == 0 || params.n_estimators == 0 {
            return Err(MlErr::EmptyDataset);
        }

        let trees = (0..params.n_estimators)
            .into_par_iter()
            .map(|i| {
                let rows: Vec<usize> = if params.bootstrap {
                    let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(i as u64));
                    (0..n).map(|_| rng.random_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };

                RegressionTree::fit(x, y, rows, &params.tree)
            })
            .collect();

        Ok(Self { trees })
    }

    /// Predicts the target of every row of `x` as the mean over all trees.
    pub fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        let mut pred = Array1::zeros(x.nrows());
        for tree in &self.trees {
            pred += &tree.predict(x);
        }
        pred / self.trees.len() as f64
    }

    /// Checks the forest has at least one tree and every tree is well formed.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.trees.is_empty() {
            return Err(MlErr::InvalidModel("forest without trees".to_string()));
        }

        self.trees.iter().try_for_each(|t| t.validate(n_features))
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
