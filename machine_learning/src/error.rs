use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    Io(io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingColumn(&'static str),
    UnknownColumn(String),
    DuplicateColumn(String),
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
    EmptyDataset,
    InvalidTestSize(f64),
    EmptyPartition {
        which: &'static str,
    },
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    SingularMatrix,
    /// A deserialized model whose parameters cannot produce predictions.
    InvalidModel(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::Io(e) => write!(f, "io error: {e}"),
            MlErr::Csv(e) => write!(f, "csv error: {e}"),
            MlErr::Json(e) => write!(f, "json error: {e}"),
            MlErr::MissingColumn(name) => write!(f, "the dataset has no '{name}' column"),
            MlErr::UnknownColumn(name) => write!(f, "the dataset has an unknown column '{name}'"),
            MlErr::DuplicateColumn(name) => {
                write!(f, "the column '{name}' appears more than once")
            }
            MlErr::InvalidValue { row, column, value } => {
                write!(f, "row {row}, column '{column}': '{value}' is not a finite number")
            }
            MlErr::RaggedRow { row, got, expected } => {
                write!(f, "row {row} has {got} fields, expected {expected}")
            }
            MlErr::EmptyDataset => write!(f, "the dataset has no rows"),
            MlErr::InvalidTestSize(size) => {
                write!(f, "the test size must lie in (0, 1), got {size}")
            }
            MlErr::EmptyPartition { which } => {
                write!(f, "the {which} partition would be empty")
            }
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::SingularMatrix => {
                write!(f, "the normal equations are singular, features are collinear")
            }
            MlErr::InvalidModel(msg) => write!(f, "invalid model: {msg}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Csv(e) => Some(e),
            MlErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for MlErr {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
