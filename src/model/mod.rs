//! Predictive loss models and the trained artifact that carries them
//!
//! The training pipeline is external; this crate only evaluates exported models.

mod artifact;
mod forest;
mod linear;

pub use artifact::{ModelArtifact, ModelSpec};
pub use forest::{RegressionForest, RegressionTree, TreeNode};
pub use linear::LinearLossModel;

/// A fitted model mapping an ordered feature vector to a predicted gross loss
pub trait LossModel: std::fmt::Debug + Send + Sync {
    /// Predict for one feature row laid out in schema order
    fn predict(&self, features: &[f64]) -> f64;

    /// Number of inputs the model was fitted on, when it is known
    fn input_width(&self) -> Option<usize>;
}
