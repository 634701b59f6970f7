pub mod config;
pub mod error;
pub mod pipeline;
mod plot;
mod report;

pub use config::TrainerConfig;
pub use error::{Result, TrainerErr};
pub use pipeline::{TrainingReport, run};
pub use plot::scatter_plot_path;
