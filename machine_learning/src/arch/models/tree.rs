use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{MlErr, Result};

/// Growth limits of a [`RegressionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth of a leaf, unbounded when `None`.
    pub max_depth: Option<usize>,
    /// Maximum amount of leaves, unbounded when `None`.
    pub max_leaves: Option<usize>,
    /// A node needs at least this many samples to be split.
    pub min_samples_split: usize,
    /// Both children of a split need at least this many samples.
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_leaves: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        value: f64,
    },
    /// Samples with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A binary regression tree minimizing the squared error of its leaves.
///
/// Nodes are stored in a flat vector, the root being the first one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// A leaf that may still be split.
struct Pending {
    node: usize,
    rows: Vec<usize>,
    depth: usize,
    split: SplitCandidate,
}

impl RegressionTree {
    /// Grows a tree over a subset of rows.
    ///
    /// Leaves are expanded best-first: the splittable leaf with the largest error reduction is
    /// split next, until no leaf can be split or `max_leaves` is reached. Split search runs in
    /// parallel across features.
    ///
    /// # Arguments
    /// * `x` - The feature matrix.
    /// * `y` - The targets.
    /// * `rows` - Rows of `x` and `y` to grow the tree on, repetitions allowed. Must not be empty.
    /// * `params` - The growth limits.
    ///
    /// # Returns
    /// The fitted tree.
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        rows: Vec<usize>,
        params: &TreeParams,
    ) -> Self {
        let mut nodes = vec![Node::Leaf {
            value: mean(y, &rows),
        }];
        let mut frontier: Vec<Pending> = Pending::new(0, rows, 0, x, y, params)
            .into_iter()
            .collect();
        let mut leaves = 1;

        while params.max_leaves.is_none_or(|max| leaves < max) {
            let Some(best) = frontier
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.split.gain.total_cmp(&b.split.gain))
                .map(|(i, _)| i)
            else {
                break;
            };

            let Pending {
                node,
                rows,
                depth,
                split,
            } = frontier.swap_remove(best);

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .into_iter()
                .partition(|&r| x[[r, split.feature]] <= split.threshold);

            let left = nodes.len();
            let right = left + 1;
            nodes.push(Node::Leaf {
                value: mean(y, &left_rows),
            });
            nodes.push(Node::Leaf {
                value: mean(y, &right_rows),
            });
            nodes[node] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            leaves += 1;

            for (child, rows) in [(left, left_rows), (right, right_rows)] {
                frontier.extend(Pending::new(child, rows, depth + 1, x, y, params));
            }
        }

        Self { nodes }
    }

    /// Checks that every split reads an existing feature and points forward to existing nodes,
    /// so prediction always ends in a leaf.
    ///
    /// # Arguments
    /// * `n_features` - The width of the rows the tree will be fed.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(MlErr::InvalidModel("tree without nodes".to_string()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(MlErr::InvalidModel(format!(
                        "leaf {idx} holds a non-finite value {value}"
                    )));
                }
                Node::Leaf { .. } => {}
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(MlErr::InvalidModel(format!(
                            "node {idx} splits on feature {feature} of {n_features}"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(MlErr::InvalidModel(format!("node {idx} has a NaN threshold")));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(MlErr::InvalidModel(format!(
                                "node {idx} points to node {child} of {}",
                                self.nodes.len()
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Predicts the target of a single sample.
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if row[feature] <= threshold { left } else { right },
            }
        }
    }

    /// Predicts the target of every row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.outer_iter().map(|row| self.predict_row(row)).collect()
    }

    /// Multiplies every leaf value by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for node in &mut self.nodes {
            if let Node::Leaf { value } = node {
                *value *= factor;
            }
        }
    }

    /// Returns the amount of leaves.
    pub fn leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Returns the length of the longest root to leaf path.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }

        walk(&self.nodes, 0)
    }
}

impl Pending {
    fn new(
        node: usize,
        rows: Vec<usize>,
        depth: usize,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        params: &TreeParams,
    ) -> Option<Self> {
        if params.max_depth.is_some_and(|max| depth >= max)
            || rows.len() < params.min_samples_split.max(2)
            || rows.len() < 2 * params.min_samples_leaf.max(1)
        {
            return None;
        }

        let split = best_split(x, y, &rows, params.min_samples_leaf.max(1))?;
        Some(Self {
            node,
            rows,
            depth,
            split,
        })
    }
}

/// Finds the split of `rows` with the largest squared error reduction.
///
/// Ties are broken in favor of the lowest feature index and then the lowest threshold.
fn best_split(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    rows: &[usize],
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let first = y[rows[0]];
    if rows.iter().all(|&r| y[r] == first) {
        return None;
    }

    let n = rows.len();
    let total: f64 = rows.iter().map(|&r| y[r]).sum();
    let parent = total * total / n as f64;

    let per_feature: Vec<Option<SplitCandidate>> = (0..x.ncols())
        .into_par_iter()
        .map(|feature| {
            let mut sorted: Vec<(f64, f64)> =
                rows.iter().map(|&r| (x[[r, feature]], y[r])).collect();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut best: Option<SplitCandidate> = None;
            let mut left_sum = 0.0;
            for i in 0..n - 1 {
                left_sum += sorted[i].1;
                let (lo, hi) = (sorted[i].0, sorted[i + 1].0);
                let n_left = i + 1;
                let n_right = n - n_left;
                if lo == hi || n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / n_left as f64
                    + right_sum * right_sum / n_right as f64
                    - parent;
                if gain > best.map_or(0.0, |b| b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(lo, hi),
                        gain,
                    });
                }
            }

            best
        })
        .collect();

    per_feature
        .into_iter()
        .flatten()
        .fold(None, |best: Option<SplitCandidate>, c| match best {
            Some(b) if b.gain >= c.gain => Some(b),
            _ => Some(c),
        })
}

/// A threshold strictly below `hi` that keeps `lo` on the left side.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid < hi { mid } else { lo }
}

fn mean(y: ArrayView1<f64>, rows: &[usize]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }

    rows.iter().map(|&r| y[r]).sum::<f64>() / rows.len() as f64
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};

    use super::*;

    fn all_rows(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn step_function_is_learned_exactly() {
        let x = Array2::from_shape_vec((6, 1), vec![1., 2., 3., 10., 11., 12.]).unwrap();
        let y = array![0., 0., 0., 5., 5., 5.];

        let tree = RegressionTree::fit(x.view(), y.view(), all_rows(6), &TreeParams::default());
        assert_eq!(tree.leaves(), 2);
        assert_eq!(tree.predict(x.view()), y);
        assert_eq!(tree.predict_row(array![6.5].view()), 0.0);
        assert_eq!(tree.predict_row(array![6.6].view()), 5.0);
    }

    #[test]
    fn split_picks_the_informative_feature() {
        // Both columns separate the target, the lowest index wins.
        let x = Array2::from_shape_vec(
            (4, 2),
            vec![
                1., 0., //
                2., 1., //
                1., 0., //
                2., 1., //
            ],
        )
        .unwrap();
        let y = array![0., 1., 0., 1.];

        let split = best_split(x.view(), y.view(), &all_rows(4), 1).unwrap();
        assert_eq!(split.feature, 0);
        assert_eq!(split.threshold, 1.5);

        let y = array![0., 1., 1., 0.];
        let x = Array2::from_shape_vec(
            (4, 2),
            vec![
                1., 0., //
                1., 1., //
                2., 1., //
                2., 0., //
            ],
        )
        .unwrap();
        let split = best_split(x.view(), y.view(), &all_rows(4), 1).unwrap();
        assert_eq!(split.feature, 1);
    }

    #[test]
    fn pure_node_is_not_split() {
        let x = Array2::from_shape_vec((3, 1), vec![1., 2., 3.]).unwrap();
        let y = array![4., 4., 4.];

        let tree = RegressionTree::fit(x.view(), y.view(), all_rows(3), &TreeParams::default());
        assert_eq!(tree.leaves(), 1);
        assert_eq!(tree.predict_row(array![100.].view()), 4.0);
    }

    #[test]
    fn growth_limits_are_honored() {
        let n = 64;
        let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(n, |i| (i * i) as f64);

        let unbounded = RegressionTree::fit(x.view(), y.view(), all_rows(n), &TreeParams::default());
        assert_eq!(unbounded.leaves(), n);

        let by_leaves = TreeParams {
            max_leaves: Some(7),
            ..TreeParams::default()
        };
        let tree = RegressionTree::fit(x.view(), y.view(), all_rows(n), &by_leaves);
        assert_eq!(tree.leaves(), 7);

        let by_depth = TreeParams {
            max_depth: Some(3),
            ..TreeParams::default()
        };
        let tree = RegressionTree::fit(x.view(), y.view(), all_rows(n), &by_depth);
        assert!(tree.depth() <= 3);
        assert_eq!(tree.leaves(), 8);

        let by_leaf_size = TreeParams {
            min_samples_leaf: 20,
            ..TreeParams::default()
        };
        let tree = RegressionTree::fit(x.view(), y.view(), all_rows(n), &by_leaf_size);
        assert!(tree.leaves() <= n / 20);
    }

    #[test]
    fn repeated_rows_are_weighted() {
        let x = Array2::from_shape_vec((2, 1), vec![0., 1.]).unwrap();
        let y = array![1., 3.];

        let params = TreeParams {
            max_leaves: Some(1),
            ..TreeParams::default()
        };
        let tree = RegressionTree::fit(x.view(), y.view(), vec![0, 0, 0, 1], &params);
        assert_eq!(tree.predict_row(array![0.].view()), 1.5);
    }

    #[test]
    fn scaling_multiplies_leaves() {
        let x = Array2::from_shape_vec((2, 1), vec![0., 1.]).unwrap();
        let y = array![2., 4.];

        let mut tree = RegressionTree::fit(x.view(), y.view(), all_rows(2), &TreeParams::default());
        tree.scale(0.5);
        assert_eq!(tree.predict(x.view()), array![1., 2.]);
    }
}
