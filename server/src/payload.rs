use machine_learning::feature::Feature;
use serde::{Deserialize, Serialize};

/// The body of a prediction request: one wine sample, every measurement required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub fixed_acidity: f64,
    pub volatile_acidity: f64,
    pub citric_acid: f64,
    pub residual_sugar: f64,
    pub chlorides: f64,
    pub free_sulfur_dioxide: f64,
    pub total_sulfur_dioxide: f64,
    pub density: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub sulphates: f64,
    pub alcohol: f64,
}

/// The body of a prediction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(rename = "Predicted Wine Quality is")]
    pub predictions: Vec<f64>,
}

impl PredictionPayload {
    /// Returns the value of a single feature.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::FixedAcidity => self.fixed_acidity,
            Feature::VolatileAcidity => self.volatile_acidity,
            Feature::CitricAcid => self.citric_acid,
            Feature::ResidualSugar => self.residual_sugar,
            Feature::Chlorides => self.chlorides,
            Feature::FreeSulfurDioxide => self.free_sulfur_dioxide,
            Feature::TotalSulfurDioxide => self.total_sulfur_dioxide,
            Feature::Density => self.density,
            Feature::Ph => self.ph,
            Feature::Sulphates => self.sulphates,
            Feature::Alcohol => self.alcohol,
        }
    }

    /// Lays the sample out in canonical feature order.
    pub fn to_features(&self) -> [f64; Feature::COUNT] {
        Feature::ALL.map(|f| self.get(f))
    }
}
