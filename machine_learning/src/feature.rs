use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the label column.
pub const LABEL: &str = "quality";

/// A physicochemical measurement of a wine sample.
///
/// The declaration order is the canonical column order of every feature matrix in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    FixedAcidity,
    VolatileAcidity,
    CitricAcid,
    ResidualSugar,
    Chlorides,
    FreeSulfurDioxide,
    TotalSulfurDioxide,
    Density,
    Ph,
    Sulphates,
    Alcohol,
}

impl Feature {
    /// Amount of features a sample has.
    pub const COUNT: usize = 11;

    /// Every feature, in canonical order.
    pub const ALL: [Feature; Self::COUNT] = [
        Feature::FixedAcidity,
        Feature::VolatileAcidity,
        Feature::CitricAcid,
        Feature::ResidualSugar,
        Feature::Chlorides,
        Feature::FreeSulfurDioxide,
        Feature::TotalSulfurDioxide,
        Feature::Density,
        Feature::Ph,
        Feature::Sulphates,
        Feature::Alcohol,
    ];

    /// Returns the header this feature has in the dataset file.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::FixedAcidity => "fixed acidity",
            Feature::VolatileAcidity => "volatile acidity",
            Feature::CitricAcid => "citric acid",
            Feature::ResidualSugar => "residual sugar",
            Feature::Chlorides => "chlorides",
            Feature::FreeSulfurDioxide => "free sulfur dioxide",
            Feature::TotalSulfurDioxide => "total sulfur dioxide",
            Feature::Density => "density",
            Feature::Ph => "pH",
            Feature::Sulphates => "sulphates",
            Feature::Alcohol => "alcohol",
        }
    }

    /// Returns the name this feature has in a prediction request.
    pub fn field_name(self) -> &'static str {
        match self {
            Feature::FixedAcidity => "fixed_acidity",
            Feature::VolatileAcidity => "volatile_acidity",
            Feature::CitricAcid => "citric_acid",
            Feature::ResidualSugar => "residual_sugar",
            Feature::Chlorides => "chlorides",
            Feature::FreeSulfurDioxide => "free_sulfur_dioxide",
            Feature::TotalSulfurDioxide => "total_sulfur_dioxide",
            Feature::Density => "density",
            Feature::Ph => "pH",
            Feature::Sulphates => "sulphates",
            Feature::Alcohol => "alcohol",
        }
    }

    /// Position of this feature in a feature row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolves a dataset header into a feature.
    ///
    /// Spaces and underscores are interchangeable and surrounding whitespace is ignored, so both
    /// `free sulfur dioxide` and `free_sulfur_dioxide` resolve to the same feature.
    ///
    /// # Arguments
    /// * `header` - The raw column header.
    ///
    /// # Returns
    /// The matching feature, if any.
    pub fn from_header(header: &str) -> Option<Feature> {
        let normalized = normalize_header(header);
        Self::ALL
            .into_iter()
            .find(|f| normalize_header(f.column_name()) == normalized)
    }

    /// Returns the canonical column names, in order.
    pub fn column_names() -> Vec<String> {
        Self::ALL
            .iter()
            .map(|f| f.column_name().to_string())
            .collect()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

pub(crate) fn normalize_header(header: &str) -> String {
    header.trim().replace('_', " ")
}
