use std::{error::Error, fmt, io, path::PathBuf};

use machine_learning::MlErr;

/// The trainer module's result type.
pub type Result<T> = std::result::Result<T, TrainerErr>;

/// Training pipeline failures.
#[derive(Debug)]
pub enum TrainerErr {
    Io(io::Error),
    Ml(MlErr),
    /// The configuration file is not valid JSON or has unknown fields.
    ConfigParse(serde_json::Error),
    InvalidConfig(String),
    Plot { path: PathBuf, msg: String },
    /// Every candidate produced an unusable score.
    NoModelSelected,
}

impl fmt::Display for TrainerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerErr::Io(e) => write!(f, "io error: {e}"),
            TrainerErr::Ml(e) => write!(f, "{e}"),
            TrainerErr::ConfigParse(e) => write!(f, "invalid config file: {e}"),
            TrainerErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            TrainerErr::Plot { path, msg } => {
                write!(f, "failed to draw {}: {msg}", path.display())
            }
            TrainerErr::NoModelSelected => write!(f, "no candidate produced a finite error"),
        }
    }
}

impl Error for TrainerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TrainerErr::Io(e) => Some(e),
            TrainerErr::Ml(e) => Some(e),
            TrainerErr::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TrainerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MlErr> for TrainerErr {
    fn from(value: MlErr) -> Self {
        Self::Ml(value)
    }
}
