use std::{fs, path::Path};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::{
    MlErr, Result,
    feature::{Feature, LABEL, normalize_header},
};

/// An in-memory table of wine samples.
///
/// Features are stored row-major in canonical [`Feature`] order, labels in a separate vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    targets: Array1<f64>,
}

/// Where each feature and the label live in a parsed header.
struct ColumnMap {
    features: [usize; Feature::COUNT],
    label: usize,
    width: usize,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `features` - A `(n, Feature::COUNT)` matrix in canonical feature order.
    /// * `targets` - The `n` labels.
    ///
    /// # Returns
    /// The dataset or an error if the shapes disagree.
    pub fn new(features: Array2<f64>, targets: Array1<f64>) -> Result<Self> {
        if features.ncols() != Feature::COUNT {
            return Err(MlErr::SizeMismatch {
                a: "feature columns",
                b: "schema",
                got: features.ncols(),
                expected: Feature::COUNT,
            });
        }

        if features.nrows() != targets.len() {
            return Err(MlErr::SizeMismatch {
                a: "feature rows",
                b: "targets",
                got: features.nrows(),
                expected: targets.len(),
            });
        }

        Ok(Self { features, targets })
    }

    /// Reads a dataset from a delimited file.
    ///
    /// # Arguments
    /// * `path` - The file to read.
    /// * `delimiter` - The field delimiter, sniffed from the header line when `None`.
    ///
    /// # Returns
    /// The parsed dataset or an error if the file is missing or malformed.
    pub fn load<P: AsRef<Path>>(path: P, delimiter: Option<u8>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("reading dataset from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content, delimiter)
    }

    /// Parses a dataset from delimited text, the first line being the header.
    ///
    /// # Arguments
    /// * `content` - The raw text.
    /// * `delimiter` - The field delimiter, sniffed from the header line when `None`.
    ///
    /// # Returns
    /// The parsed dataset or an error if a column is missing, unknown or not numeric.
    pub fn parse(content: &str, delimiter: Option<u8>) -> Result<Self> {
        let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(content));
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let columns = ColumnMap::from_headers(reader.headers()?)?;
        let mut data = Vec::new();
        let mut targets = Vec::new();

        for (i, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let line = i + 2;
            if record.len() != columns.width {
                return Err(MlErr::RaggedRow {
                    row: line,
                    got: record.len(),
                    expected: columns.width,
                });
            }

            let cell = |idx: usize, column: &str| -> Result<f64> {
                let raw = &record[idx];
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| MlErr::InvalidValue {
                        row: line,
                        column: column.to_string(),
                        value: raw.to_string(),
                    })
            };

            for (feature, &idx) in Feature::ALL.iter().zip(&columns.features) {
                data.push(cell(idx, feature.column_name())?);
            }
            targets.push(cell(columns.label, LABEL)?);
        }

        if targets.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        let features = Array2::from_shape_vec((targets.len(), Feature::COUNT), data)
            .map_err(|_| MlErr::SizeMismatch {
                a: "cells",
                b: "rows",
                got: targets.len(),
                expected: Feature::COUNT,
            })?;

        Self::new(features, Array1::from(targets))
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns the feature matrix.
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Returns the labels.
    pub fn targets(&self) -> ArrayView1<'_, f64> {
        self.targets.view()
    }

    /// Returns every value of a single feature.
    pub fn column(&self, feature: Feature) -> ArrayView1<'_, f64> {
        self.features.column(feature.index())
    }

    /// Builds a new dataset out of the given rows, in the given order.
    ///
    /// # Arguments
    /// * `indices` - Row indices, each lower than `self.len()`.
    ///
    /// # Returns
    /// The selected rows.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
        }
    }

    /// Returns the first `n` rows (or fewer if the dataset is shorter).
    pub fn head(&self, n: usize) -> Self {
        let indices: Vec<usize> = (0..n.min(self.len())).collect();
        self.select(&indices)
    }

    /// Splits the dataset into its feature matrix and its labels.
    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>) {
        (self.features, self.targets)
    }
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let mut features = [None; Feature::COUNT];
        let mut label = None;

        for (idx, header) in headers.iter().enumerate() {
            let header = header.trim_matches('"');
            let slot = if normalize_header(header) == LABEL {
                &mut label
            } else if let Some(feature) = Feature::from_header(header) {
                &mut features[feature.index()]
            } else {
                return Err(MlErr::UnknownColumn(header.to_string()));
            };

            if slot.replace(idx).is_some() {
                return Err(MlErr::DuplicateColumn(header.to_string()));
            }
        }

        let mut resolved = [0; Feature::COUNT];
        for (feature, idx) in Feature::ALL.iter().zip(features) {
            resolved[feature.index()] = idx.ok_or(MlErr::MissingColumn(feature.column_name()))?;
        }

        Ok(Self {
            features: resolved,
            label: label.ok_or(MlErr::MissingColumn(LABEL))?,
            width: headers.len(),
        })
    }
}

/// Picks `;` when the header line contains one, `,` otherwise.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.contains(';') { b';' } else { b',' }
}
