use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{Result, TrainerErr};

/// Where the training pipeline reads from and writes to, and how it splits the data.
///
/// Every field is optional in the configuration file, missing ones take their default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    pub data_path: PathBuf,
    pub figs_dir: PathBuf,
    pub artifact_path: PathBuf,
    pub test_size: f64,
    pub seed: u64,
    pub head_rows: usize,
    /// Field delimiter of the dataset, sniffed from its header when absent.
    pub delimiter: Option<char>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("../data/winequality-red.csv"),
            figs_dir: PathBuf::from("../figs"),
            artifact_path: PathBuf::from("best_model.json"),
            test_size: 0.2,
            seed: 24,
            head_rows: 5,
            delimiter: None,
        }
    }
}

impl TrainerConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Arguments
    /// * `path` - The configuration file.
    ///
    /// # Returns
    /// The validated configuration or an error if the file cannot be read, parsed or validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(TrainerErr::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainerErr::InvalidConfig(format!(
                "test_size must lie in (0, 1), got {}",
                self.test_size
            )));
        }

        if let Some(c) = self.delimiter.filter(|c| !c.is_ascii()) {
            return Err(TrainerErr::InvalidConfig(format!(
                "delimiter must be a single ascii character, got '{c}'"
            )));
        }

        Ok(())
    }

    /// The delimiter as the byte the csv reader expects.
    pub fn delimiter_byte(&self) -> Option<u8> {
        self.delimiter.map(|c| c as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: TrainerConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.figs_dir, PathBuf::from("../figs"));
        assert_eq!(config.artifact_path, PathBuf::from("best_model.json"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_str::<TrainerConfig>(r#"{ "sed": 7 }"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn file_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trainer.json");

        fs::write(&path, r#"{ "test_size": 1.5 }"#).unwrap();
        assert!(matches!(
            TrainerConfig::from_file(&path),
            Err(TrainerErr::InvalidConfig(_))
        ));

        fs::write(&path, r#"{ "test_size": 0.25, "delimiter": ";" }"#).unwrap();
        let config = TrainerConfig::from_file(&path).unwrap();
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.delimiter_byte(), Some(b';'));
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let config = TrainerConfig {
            delimiter: Some('§'),
            ..TrainerConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(TrainerConfig::default().validate().is_ok());
    }
}
