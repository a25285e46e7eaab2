//! Random forest classifier loaded from an exported node list.
//!
//! Each tree is a flat list of nodes where node 0 is the root. Split nodes
//! send `x[feature] <= threshold` to `left`, everything else (NaN included)
//! to `right`. Leaves carry per-class weights `[negative, positive]`; the
//! forest probability is the mean over trees of the leaf's positive share,
//! the same averaging scikit-learn applies.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::classifier_trait::ClassifierModel;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Children must point forward in the node list, which rules out cycles.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let n_nodes = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature} of {n_features}"
                        ));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= n_nodes {
                            return Err(format!("node {idx} has invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != 2 || value.iter().any(|v| *v < 0.0 || !v.is_finite()) {
                        return Err(format!(
                            "leaf {idx} must hold two non-negative class weights"
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn positive_share(&self, x: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = x.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    return if total > 0.0 { value[1] / total } else { 0.0 };
                }
            }
        }
    }
}

/// Bagged decision trees with recorded column names and importances.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RandomForestClassifier {
    pub feature_names: Vec<String>,
    pub feature_importances: Vec<f64>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    /// Check the artifact is internally consistent before it is served.
    pub fn validate(&self) -> Result<(), ModelError> {
        let model = self.name().to_string();
        if self.feature_names.is_empty() {
            return Err(ModelError::EmptySchema(model));
        }
        if self.feature_importances.len() != self.feature_names.len() {
            return Err(ModelError::LengthMismatch {
                model,
                what: "feature importances",
                names: self.feature_names.len(),
                values: self.feature_importances.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(ModelError::InvalidTree {
                model,
                tree: 0,
                reason: "forest has no trees".to_string(),
            });
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_names.len())
                .map_err(|reason| ModelError::InvalidTree {
                    model: model.clone(),
                    tree: tree_idx,
                    reason,
                })?;
        }
        Ok(())
    }

    fn mean_positive_share(&self, x: ArrayView1<f64>) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.positive_share(x)).sum();
        sum / self.trees.len() as f64
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, x: ArrayView1<f64>) -> f64 {
        if self.mean_positive_share(x) > 0.5 {
            1.0
        } else {
            0.0
        }
    }

    fn predict_proba(&self, x: ArrayView1<f64>) -> Option<f64> {
        Some(self.mean_positive_share(x))
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        Some(&self.feature_importances)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stump(feature: usize, threshold: f64, low: [f64; 2], high: [f64; 2]) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    value: low.to_vec(),
                },
                TreeNode::Leaf {
                    value: high.to_vec(),
                },
            ],
        }
    }

    fn forest() -> RandomForestClassifier {
        RandomForestClassifier {
            feature_names: vec!["age".to_string(), "cholesterol".to_string()],
            feature_importances: vec![0.75, 0.25],
            trees: vec![
                stump(0, 50.0, [8.0, 2.0], [2.0, 8.0]),
                stump(1, 240.0, [3.0, 1.0], [1.0, 3.0]),
            ],
        }
    }

    #[test]
    fn averages_leaf_shares() {
        let model = forest();
        model.validate().unwrap();
        let young_low = model.predict_proba(array![40.0, 200.0].view()).unwrap();
        assert!((young_low - (0.2 + 0.25) / 2.0).abs() < 1e-12);
        let old_high = model.predict_proba(array![65.0, 280.0].view()).unwrap();
        assert!((old_high - (0.8 + 0.75) / 2.0).abs() < 1e-12);
        assert_eq!(model.predict(array![65.0, 280.0].view()), 1.0);
        assert_eq!(model.predict(array![40.0, 200.0].view()), 0.0);
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let model = forest();
        let at = model.predict_proba(array![50.0, 240.0].view()).unwrap();
        assert!((at - (0.2 + 0.25) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_backward_children() {
        let mut model = forest();
        model.trees[0].nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 1.0,
            left: 0,
            right: 2,
        };
        assert!(matches!(
            model.validate(),
            Err(ModelError::InvalidTree { tree: 0, .. })
        ));
    }

    #[test]
    fn rejects_importance_length_mismatch() {
        let mut model = forest();
        model.feature_importances.pop();
        assert!(matches!(
            model.validate(),
            Err(ModelError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn parses_exported_json() {
        let json = r#"{
            "feature_names": ["age"],
            "feature_importances": [1.0],
            "trees": [{"nodes": [
                {"feature": 0, "threshold": 55.5, "left": 1, "right": 2},
                {"value": [30, 10]},
                {"value": [5, 15]}
            ]}]
        }"#;
        let model: RandomForestClassifier = serde_json::from_str(json).unwrap();
        model.validate().unwrap();
        assert_eq!(model.predict_proba(array![60.0].view()), Some(0.75));
    }
}
