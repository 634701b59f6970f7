use std::{error::Error, fmt};

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use machine_learning::MlErr;
use serde::Serialize;

/// The server module's result type.
pub type Result<T> = std::result::Result<T, ServerErr>;

/// Failures that keep the service from starting.
#[derive(Debug)]
pub enum ServerErr {
    /// The artifact is missing, unreadable or holds a malformed model.
    Ml(MlErr),
    /// The artifact was trained on other features, or on the same ones in another order.
    SchemaMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
    InvalidConfig(String),
}

impl fmt::Display for ServerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerErr::Ml(e) => write!(f, "failed to load the model: {e}"),
            ServerErr::SchemaMismatch { expected, got } => write!(
                f,
                "the model expects features {got:?}, the service provides {expected:?}"
            ),
            ServerErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for ServerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServerErr::Ml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for ServerErr {
    fn from(value: MlErr) -> Self {
        Self::Ml(value)
    }
}

/// A request body that does not match the prediction schema.
#[derive(Debug)]
pub struct ValidationError(pub String);

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for ValidationError {}

impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody { detail: &self.0 })
    }
}
