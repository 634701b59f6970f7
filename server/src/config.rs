use std::{env, num::NonZeroUsize, path::PathBuf};

use crate::{Result, ServerErr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL_PATH: &str = "best_model.json";

/// Immutable settings of the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    /// Amount of HTTP workers, one per core when `None`.
    pub workers: Option<NonZeroUsize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            workers: None,
        }
    }
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `MODEL_PATH` and `WORKERS` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration out of a key lookup, unset keys take their default.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, if set.
    ///
    /// # Returns
    /// The configuration or an error if a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse::<u16>()
                .map_err(|e| ServerErr::InvalidConfig(format!("PORT '{port}': {e}")))?;
        }

        if let Some(path) = lookup("MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }

        if let Some(workers) = lookup("WORKERS") {
            let n = workers
                .parse::<NonZeroUsize>()
                .map_err(|e| ServerErr::InvalidConfig(format!("WORKERS '{workers}': {e}")))?;
            config.workers = Some(n);
        }

        Ok(config)
    }

    /// The `host:port` the service binds to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn unset_variables_take_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "127.0.0.1:8000");
    }

    #[test]
    fn variables_override_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9090"),
            ("MODEL_PATH", "/models/wine.json"),
            ("WORKERS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "0.0.0.0:9090");
        assert_eq!(config.model_path, PathBuf::from("/models/wine.json"));
        assert_eq!(config.workers, NonZeroUsize::new(2));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        for vars in [[("PORT", "http")], [("PORT", "70000")], [("WORKERS", "0")]] {
            assert!(matches!(
                ServerConfig::from_lookup(lookup(&vars)),
                Err(ServerErr::InvalidConfig(_))
            ));
        }
    }
}
