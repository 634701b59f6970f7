use ndarray::{Array1, ArrayView1, ArrayView2, Axis, aview1};
use serde::{Deserialize, Serialize};

use super::models::{
    GradientBoostingModel, GradientBoostingParams, LinearModel, RandomForestModel,
    RandomForestParams,
};
use crate::{Result, feature::Feature};

/// A regression algorithm together with its hyperparameters, ready to be fitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    LinearRegression,
    GradientBoosting(GradientBoostingParams),
    RandomForest(RandomForestParams),
}

/// A fitted regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum Model {
    Linear(LinearModel),
    GradientBoosting(GradientBoostingModel),
    RandomForest(RandomForestModel),
}

impl Algorithm {
    /// Fits the algorithm.
    ///
    /// # Arguments
    /// * `x` - The training feature matrix.
    /// * `y` - The training targets.
    ///
    /// # Returns
    /// The fitted model or an error if fitting failed.
    pub fn fit(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Model> {
        let model = match self {
            Algorithm::LinearRegression => Model::Linear(LinearModel::fit(x, y)?),
            Algorithm::GradientBoosting(params) => {
                Model::GradientBoosting(GradientBoostingModel::fit(x, y, params)?)
            }
            Algorithm::RandomForest(params) => {
                Model::RandomForest(RandomForestModel::fit(x, y, params)?)
            }
        };

        Ok(model)
    }
}

impl Model {
    /// Predicts the target of every row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        match self {
            Model::Linear(m) => m.predict(x),
            Model::GradientBoosting(m) => m.predict(x),
            Model::RandomForest(m) => m.predict(x),
        }
    }

    /// Checks that the model can predict rows of `n_features` values.
    ///
    /// Fitted models always pass; this guards models read back from disk.
    ///
    /// # Arguments
    /// * `n_features` - The width of the rows the model will be fed.
    ///
    /// # Returns
    /// An error describing the first malformed parameter found.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        match self {
            Model::Linear(m) => m.validate(n_features),
            Model::GradientBoosting(m) => m.validate(n_features),
            Model::RandomForest(m) => m.validate(n_features),
        }
    }

    /// Predicts the target of a single sample given in canonical feature order.
    pub fn predict_one(&self, sample: &[f64; Feature::COUNT]) -> f64 {
        let x = aview1(sample).insert_axis(Axis(0));
        self.predict(x)[0]
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::MlErr;

    #[test]
    fn every_algorithm_fits_and_predicts_one_value_per_row() {
        let n = 60;
        let mut rng = StdRng::seed_from_u64(1);
        let x = Array2::from_shape_fn((n, Feature::COUNT), |_| rng.random_range(0.0..10.0));
        let y = x.map_axis(Axis(1), |r| r.sum() * 0.1);

        let algorithms = [
            Algorithm::LinearRegression,
            Algorithm::GradientBoosting(GradientBoostingParams::default()),
            Algorithm::RandomForest(RandomForestParams {
                n_estimators: 5,
                ..RandomForestParams::default()
            }),
        ];

        for algorithm in algorithms {
            let model = algorithm.fit(x.view(), y.view()).unwrap();
            model.validate(Feature::COUNT).unwrap();
            assert_eq!(model.predict(x.view()).len(), n);

            let mut sample = [0.0; Feature::COUNT];
            sample.copy_from_slice(x.row(3).as_slice().unwrap());
            let all = model.predict(x.view());
            assert!((model.predict_one(&sample) - all[3]).abs() < 1e-9);
        }
    }

    #[test]
    fn model_kind_is_tagged_in_json() {
        let x = Array2::from_shape_vec((3, 1), vec![0., 1., 2.]).unwrap();
        let y = Array1::from(vec![1., 3., 5.]);
        let model = Algorithm::LinearRegression.fit(x.view(), y.view()).unwrap();

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["kind"], "linear");
        assert!(json["params"]["coefficients"].is_object());
    }

    fn forest_of(nodes: serde_json::Value) -> Model {
        serde_json::from_value(serde_json::json!({
            "kind": "random_forest",
            "params": { "trees": [{ "nodes": nodes }] }
        }))
        .unwrap()
    }

    fn assert_invalid(model: &Model) {
        assert!(matches!(
            model.validate(Feature::COUNT),
            Err(MlErr::InvalidModel(_))
        ));
    }

    #[test]
    fn linear_model_with_wrong_width_is_invalid() {
        let model: Model = serde_json::from_value(serde_json::json!({
            "kind": "linear",
            "params": {
                "intercept": 1.0,
                "coefficients": { "v": 1, "dim": [3], "data": [1.0, 2.0, 3.0] }
            }
        }))
        .unwrap();
        assert_invalid(&model);
    }

    #[test]
    fn empty_forest_is_invalid() {
        let model: Model = serde_json::from_value(serde_json::json!({
            "kind": "random_forest",
            "params": { "trees": [] }
        }))
        .unwrap();
        assert_invalid(&model);
    }

    #[test]
    fn tree_without_nodes_is_invalid() {
        assert_invalid(&forest_of(serde_json::json!([])));
    }

    #[test]
    fn split_on_missing_feature_is_invalid() {
        assert_invalid(&forest_of(serde_json::json!([
            { "Split": { "feature": Feature::COUNT, "threshold": 0.5, "left": 1, "right": 2 } },
            { "Leaf": { "value": 1.0 } },
            { "Leaf": { "value": 2.0 } }
        ])));
    }

    #[test]
    fn dangling_or_cyclic_children_are_invalid() {
        for (left, right) in [(1, 7), (0, 2), (1, 3)] {
            let model = forest_of(serde_json::json!([
                { "Split": { "feature": 0, "threshold": 0.5, "left": left, "right": right } },
                { "Leaf": { "value": 1.0 } },
                { "Leaf": { "value": 2.0 } }
            ]));
            assert_invalid(&model);
        }
    }

    #[test]
    fn boosting_without_trees_is_valid() {
        let model: Model = serde_json::from_value(serde_json::json!({
            "kind": "gradient_boosting",
            "params": { "base_score": 5.6, "trees": [] }
        }))
        .unwrap();
        model.validate(Feature::COUNT).unwrap();
        assert_eq!(model.predict_one(&[0.0; Feature::COUNT]), 5.6);
    }
}
