use std::path::Path;

use machine_learning::{arch::Model, artifact::ModelArtifact, feature::Feature};

use crate::{Result, ServerErr, payload::PredictionPayload};

/// Everything a request handler needs, built once at startup and never mutated.
#[derive(Debug)]
pub struct ServiceContext {
    name: String,
    model: Model,
}

impl ServiceContext {
    /// Loads the model artifact and checks it was trained on the request schema.
    ///
    /// # Arguments
    /// * `path` - The artifact written by the training pipeline.
    ///
    /// # Returns
    /// The context or an error if the artifact is missing, corrupt or trained on other features.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading model from {}", path.display());
        Self::from_artifact(ModelArtifact::load(path)?)
    }

    /// Accepts an artifact only if its features match the request schema and its model can
    /// predict rows of that width.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        if !artifact.matches_schema() {
            return Err(ServerErr::SchemaMismatch {
                expected: Feature::column_names(),
                got: artifact.features,
            });
        }
        artifact.model.validate(Feature::COUNT)?;

        log::info!(
            "serving {} (held-out MSE {})",
            artifact.name,
            artifact.mse
        );
        Ok(Self {
            name: artifact.name,
            model: artifact.model,
        })
    }

    /// Name of the model being served.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Predicts the quality of a single wine sample.
    pub fn predict(&self, payload: &PredictionPayload) -> f64 {
        self.model.predict_one(&payload.to_features())
    }
}
