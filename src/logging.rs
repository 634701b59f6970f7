use std::{env, fs, path::PathBuf};

use env_logger::{Builder, Env};
use log::LevelFilter;

const DEFAULT_CONF: &str = "logger.conf";

/// Turns the content of a logger configuration file into env_logger filter directives.
///
/// Blank lines and `#` comments are skipped, every other line may hold one or more
/// comma separated directives.
pub fn directives(conf: &str) -> String {
    conf.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global logger.
///
/// Filters start at `info`, then the configuration file (`LOGGER_CONF` or `logger.conf`)
/// is applied, then `RUST_LOG`.
pub fn init() {
    let path = env::var_os("LOGGER_CONF")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONF));

    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);

    let conf = fs::read_to_string(&path);
    if let Ok(conf) = &conf {
        builder.parse_filters(&directives(conf));
    }

    builder.parse_env(Env::default()).init();

    match conf {
        Ok(_) => log::debug!("logger configured from {}", path.display()),
        Err(e) if env::var_os("LOGGER_CONF").is_some() => {
            log::warn!("could not read {}: {e}", path.display())
        }
        Err(_) => {}
    }
}
