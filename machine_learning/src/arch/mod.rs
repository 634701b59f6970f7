pub mod loss;
mod model;
pub mod models;

pub use model::{Algorithm, Model};
