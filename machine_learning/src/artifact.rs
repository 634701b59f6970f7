use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{Result, arch::Model, feature::Feature};

/// A fitted model persisted to disk together with what is needed to trust it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Name of the candidate the model came from.
    pub name: String,
    /// Held-out mean squared error the model scored.
    pub mse: f64,
    /// Feature column names the model was trained on, in input order.
    pub features: Vec<String>,
    pub model: Model,
}

impl ModelArtifact {
    /// Wraps a model trained on the canonical feature order.
    pub fn new(name: impl Into<String>, mse: f64, model: Model) -> Self {
        Self {
            name: name.into(),
            mse,
            features: Feature::column_names(),
            model,
        }
    }

    /// Writes the artifact as JSON, replacing any previous file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads an artifact written by [`ModelArtifact::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Whether the artifact's inputs are exactly the canonical features, in canonical order.
    pub fn matches_schema(&self) -> bool {
        self.features.len() == Feature::COUNT
            && self
                .features
                .iter()
                .zip(Feature::ALL)
                .all(|(name, feature)| name == feature.column_name())
    }
}
