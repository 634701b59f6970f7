pub mod arch;
pub mod artifact;
pub mod dataset;
pub mod error;
pub mod feature;
pub mod selection;
pub mod split;
pub mod stats;
mod test;

pub use error::{MlErr, Result};
