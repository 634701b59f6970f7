use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{MlErr, Result, dataset::Dataset};

/// A train/test partition of a dataset.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    train_indices: Vec<usize>,
    test_indices: Vec<usize>,
}

impl Split {
    /// Row indices of the original dataset that ended up in the training partition.
    pub fn train_indices(&self) -> &[usize] {
        &self.train_indices
    }

    /// Row indices of the original dataset that ended up in the test partition.
    pub fn test_indices(&self) -> &[usize] {
        &self.test_indices
    }
}

/// Partitions a dataset into disjoint train and test subsets.
///
/// The rows are shuffled with a generator seeded from `seed`, the first `ceil(n * test_size)`
/// shuffled rows become the test partition and the rest the training partition. The same
/// dataset and seed always yield the same partition.
///
/// # Arguments
/// * `dataset` - The full dataset.
/// * `test_size` - Fraction of rows held out for evaluation, in `(0, 1)`.
/// * `seed` - The shuffling seed.
///
/// # Returns
/// The partition or an error if `test_size` is out of range or a partition would be empty.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<Split> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlErr::InvalidTestSize(test_size));
    }

    let n = dataset.len();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 {
        return Err(MlErr::EmptyPartition { which: "test" });
    }
    if n_test >= n {
        return Err(MlErr::EmptyPartition { which: "train" });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train_indices = indices.split_off(n_test);
    let test_indices = indices;

    Ok(Split {
        train: dataset.select(&train_indices),
        test: dataset.select(&test_indices),
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ndarray::{Array1, Array2};

    use super::*;
    use crate::feature::Feature;

    fn dataset(n: usize) -> Dataset {
        let features = Array2::from_shape_fn((n, Feature::COUNT), |(i, j)| (i * 100 + j) as f64);
        let targets = Array1::from_shape_fn(n, |i| i as f64);
        Dataset::new(features, targets).unwrap()
    }

    #[test]
    fn partition_sizes_follow_test_fraction() {
        let split = train_test_split(&dataset(1599), 0.2, 24).unwrap();
        assert_eq!(split.test.len(), 320);
        assert_eq!(split.train.len(), 1279);
    }

    #[test]
    fn partitions_are_disjoint_and_exhaustive() {
        let split = train_test_split(&dataset(50), 0.2, 7).unwrap();

        let train: HashSet<_> = split.train_indices().iter().copied().collect();
        let test: HashSet<_> = split.test_indices().iter().copied().collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), 50);

        // Labels are the row index, so they identify the rows that were copied.
        for (row, &idx) in split.test_indices().iter().enumerate() {
            assert_eq!(split.test.targets()[row], idx as f64);
        }
    }

    #[test]
    fn same_seed_same_partition() {
        let ds = dataset(100);
        let a = train_test_split(&ds, 0.2, 24).unwrap();
        let b = train_test_split(&ds, 0.2, 24).unwrap();
        assert_eq!(a.test_indices(), b.test_indices());
        assert_eq!(a.train, b.train);

        let c = train_test_split(&ds, 0.2, 25).unwrap();
        assert_ne!(a.test_indices(), c.test_indices());
    }

    #[test]
    fn rejects_degenerate_fractions() {
        let ds = dataset(10);
        assert!(matches!(
            train_test_split(&ds, 0.0, 1),
            Err(MlErr::InvalidTestSize(_))
        ));
        assert!(matches!(
            train_test_split(&ds, 1.0, 1),
            Err(MlErr::InvalidTestSize(_))
        ));
        assert!(matches!(
            train_test_split(&dataset(1), 0.5, 1),
            Err(MlErr::EmptyPartition { which: "train" })
        ));
    }
}
