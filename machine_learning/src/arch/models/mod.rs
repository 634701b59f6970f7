mod boosting;
mod forest;
mod linear;
mod tree;

pub use boosting::{GradientBoostingModel, GradientBoostingParams};
pub use forest::{RandomForestModel, RandomForestParams};
pub use linear::LinearModel;
pub use tree::{Node, RegressionTree, TreeParams};
