#![cfg(test)]

use ndarray::{Array1, Array2, Axis};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    dataset::Dataset,
    feature::Feature,
    selection::{Evaluation, candidates, evaluate, select_best},
    split::train_test_split,
};

/// A wine-like dataset whose quality mostly follows alcohol and volatile acidity.
fn synthetic_wines(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let features = Array2::from_shape_fn((n, Feature::COUNT), |_| rng.random_range(0.0..1.0));
    let targets = features.map_axis(Axis(1), |r| {
        let alcohol = r[Feature::Alcohol.index()];
        let volatile = r[Feature::VolatileAcidity.index()];
        3.0 + 4.0 * alcohol - 2.0 * volatile + if alcohol > 0.7 { 1.0 } else { 0.0 }
    });

    Dataset::new(features, targets).unwrap()
}

#[test]
fn every_candidate_beats_the_mean_on_the_same_held_out_rows() {
    let dataset = synthetic_wines(500, 11);
    let split = train_test_split(&dataset, 0.2, 24).unwrap();
    let baseline = {
        let mean = split.train.targets().mean().unwrap();
        let diff = &split.test.targets() - mean;
        diff.mapv(|d| d * d).mean().unwrap()
    };

    let mut evaluations = Vec::new();
    for candidate in candidates(24) {
        let model = candidate
            .algorithm
            .fit(split.train.features(), split.train.targets())
            .unwrap();

        let mse = evaluate(&model, &split.test);
        assert!(mse < baseline, "{} scored {mse} vs {baseline}", candidate.name);
        evaluations.push(Evaluation {
            name: candidate.name,
            mse,
        });
    }

    let best = select_best(&evaluations).unwrap();
    for evaluation in &evaluations {
        assert!(evaluations[best].mse <= evaluation.mse);
    }
}

#[test]
fn refitting_with_the_same_seed_reproduces_the_scores() {
    let dataset = synthetic_wines(200, 5);

    let scores = || -> Vec<f64> {
        let split = train_test_split(&dataset, 0.2, 24).unwrap();
        candidates(24)
            .iter()
            .map(|c| {
                let model = c
                    .algorithm
                    .fit(split.train.features(), split.train.targets())
                    .unwrap();
                evaluate(&model, &split.test)
            })
            .collect()
    };

    assert_eq!(scores(), scores());
}

#[test]
fn test_rows_never_reach_training() {
    let n = 100;
    let features = Array2::from_shape_fn((n, Feature::COUNT), |(i, _)| i as f64);
    let targets = Array1::from_shape_fn(n, |i| i as f64);
    let dataset = Dataset::new(features, targets).unwrap();

    let split = train_test_split(&dataset, 0.2, 24).unwrap();
    for test_label in split.test.targets() {
        assert!(!split.train.targets().iter().any(|t| t == test_label));
    }
}
