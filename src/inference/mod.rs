//! Model inference.
//!
//! Wraps the fixed pre-trained regression ensemble and the post-processing
//! that maps its raw output back to a property value.

pub mod model;
mod predictor;

pub use model::{GradientBoostedTrees, RegressionTree, Regressor};
pub use predictor::{ArtifactPaths, Explanation, Predictor};
