use machine_learning::{
    dataset::Dataset,
    feature::{Feature, LABEL},
    stats::ColumnSummary,
};

/// Renders the rows of `dataset` as a text table, one line per sample.
pub(crate) fn format_rows(dataset: &Dataset) -> String {
    let headers: Vec<&str> = Feature::ALL
        .iter()
        .map(|f| f.column_name())
        .chain(std::iter::once(LABEL))
        .collect();
    let widths: Vec<usize> = headers.iter().map(|h| h.len().max(8)).collect();

    let mut out = format!("{:>5}", "");
    for (h, w) in headers.iter().zip(widths.iter().copied()) {
        out.push_str(&format!("  {h:>w$}"));
    }

    let features = dataset.features();
    let targets = dataset.targets();
    for (i, row) in features.outer_iter().enumerate() {
        out.push_str(&format!("\n{i:>5}"));
        for (v, w) in row.iter().chain([&targets[i]]).zip(widths.iter().copied()) {
            out.push_str(&format!("  {v:>w$.4}"));
        }
    }

    out
}

/// Renders column summaries as a text table, one line per column.
pub(crate) fn format_summaries(summaries: &[ColumnSummary]) -> String {
    let name_width = summaries
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "{:<name_width$}  {:>7}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for s in summaries {
        out.push_str(&format!(
            "\n{:<name_width$}  {:>7}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}",
            s.name, s.count, s.mean, s.std, s.min, s.q25, s.q50, s.q75, s.max
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use machine_learning::stats::describe;
    use ndarray::{Array1, Array2};

    use super::*;

    fn dataset() -> Dataset {
        let features = Array2::from_shape_fn((3, Feature::COUNT), |(i, j)| (i + j) as f64);
        Dataset::new(features, Array1::from(vec![5.0, 6.0, 7.0])).unwrap()
    }

    #[test]
    fn rows_table_has_header_and_one_line_per_row() {
        let table = format_rows(&dataset().head(2));
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("fixed acidity"));
        assert!(lines[0].trim_end().ends_with("quality"));
        assert!(lines[2].trim_end().ends_with("6.0000"));
    }

    #[test]
    fn summary_table_has_one_line_per_column() {
        let table = format_summaries(&describe(&dataset()));
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), Feature::COUNT + 2);
        assert!(lines[0].contains("25%"));
        assert!(lines.last().unwrap().starts_with("quality"));
    }
}
