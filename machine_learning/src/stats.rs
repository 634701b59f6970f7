use ndarray::ArrayView1;

use crate::{
    dataset::Dataset,
    feature::{Feature, LABEL},
};

/// Descriptive statistics of a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, `NaN` with fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summarizes a column of values.
    ///
    /// # Arguments
    /// * `name` - The column's name.
    /// * `values` - The column's values, must not be empty.
    ///
    /// # Returns
    /// The column's summary.
    pub fn new(name: impl Into<String>, values: ArrayView1<f64>) -> Self {
        let count = values.len();
        let mean = values.mean().unwrap_or(f64::NAN);
        let std = if count > 1 { values.std(1.0) } else { f64::NAN };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            name: name.into(),
            count,
            mean,
            std,
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// Summarizes every feature column and the label column, in canonical order.
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    Feature::ALL
        .iter()
        .map(|&f| ColumnSummary::new(f.column_name(), dataset.column(f)))
        .chain(std::iter::once(ColumnSummary::new(
            LABEL,
            dataset.targets(),
        )))
        .collect()
}

/// Linearly interpolated quantile of already sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };

    let pos = q * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
