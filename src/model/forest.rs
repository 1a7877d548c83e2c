//! Regression tree ensemble (random-forest style) evaluated from an exported node table
//!
//! Nodes are stored in a flat array with the root at index 0. A split sends a row
//! left when `features[feature] <= threshold`. Children always have a larger index
//! than their parent, so evaluation terminates.

use serde::{Deserialize, Serialize};

use super::LossModel;
use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Check node links and feature references against the input width
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but the model has {} inputs",
                            idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", idx, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", idx));
                    }
                }
            }
        }

        Ok(())
    }

    fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split { feature, threshold, left, right } => {
                    let x = features.get(feature).copied().unwrap_or(0.0);
                    idx = if x <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Ensemble prediction is the mean of its trees
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionForest {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RegressionForest {
    /// Build a validated forest over `n_features` inputs
    pub fn new(n_features: usize, trees: Vec<RegressionTree>) -> Result<Self, ModelError> {
        if trees.is_empty() {
            return Err(ModelError::InvalidTree {
                tree: 0,
                reason: "forest has no trees".to_string(),
            });
        }
        for (tree, t) in trees.iter().enumerate() {
            t.validate(n_features)
                .map_err(|reason| ModelError::InvalidTree { tree, reason })?;
        }
        Ok(Self { n_features, trees })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl LossModel for RegressionForest {
    fn predict(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        total / self.trees.len() as f64
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.n_features)
    }
}
