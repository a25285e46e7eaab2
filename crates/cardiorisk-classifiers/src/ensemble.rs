//! Two-stage ensemble: two base classifiers blended by a meta model.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::ClassifierModel;
use crate::schema::{ModelFeatureVector, Reconciler, UserInputRecord};

/// Input names the meta model was trained on.
pub const BLENDER_FEATURES: [&str; 2] = ["p_uci", "p_fram"];

/// Positive-class probabilities from the two base models for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityPair {
    pub p_uci: f64,
    pub p_fram: f64,
}

impl ProbabilityPair {
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "p_uci" => Some(self.p_uci),
            "p_fram" => Some(self.p_fram),
            _ => None,
        }
    }
}

/// A base classifier that is known to report probabilities and importances.
pub struct BaseModel {
    role: &'static str,
    model: Box<dyn ClassifierModel>,
}

impl BaseModel {
    pub fn new(role: &'static str, model: Box<dyn ClassifierModel>) -> Result<Self, ModelError> {
        let n_features = model.feature_names().len();
        if n_features == 0 {
            return Err(ModelError::EmptySchema(role.to_string()));
        }
        match model.feature_importances() {
            None => return Err(ModelError::MissingImportances(role.to_string())),
            Some(importances) if importances.len() != n_features => {
                return Err(ModelError::LengthMismatch {
                    model: role.to_string(),
                    what: "feature importances",
                    names: n_features,
                    values: importances.len(),
                })
            }
            Some(_) => {}
        }
        let probe = Array1::<f64>::zeros(n_features);
        if model.predict_proba(probe.view()).is_none() {
            return Err(ModelError::MissingProbability(role.to_string()));
        }
        Ok(Self { role, model })
    }

    pub fn role(&self) -> &'static str {
        self.role
    }

    /// Training-time column names of this model.
    pub fn columns(&self) -> &[String] {
        self.model.feature_names()
    }

    pub fn feature_importances(&self) -> &[f64] {
        self.model.feature_importances().unwrap_or(&[])
    }

    pub fn predict_probability_positive(&self, x: &ModelFeatureVector) -> f64 {
        self.model
            .predict_proba(x.view())
            .unwrap_or_else(|| self.model.predict(x.view()))
    }
}

/// The UCI and Framingham base models.
pub struct BaseModelPair {
    pub uci: BaseModel,
    pub fram: BaseModel,
}

impl BaseModelPair {
    pub fn new(uci: BaseModel, fram: BaseModel) -> Self {
        Self { uci, fram }
    }

    /// Reconcile `record` into both schemas and score it.
    pub fn score(&self, reconciler: &Reconciler, record: &UserInputRecord) -> ProbabilityPair {
        let uci_x = reconciler.build(self.uci.columns(), record);
        let fram_x = reconciler.build(self.fram.columns(), record);
        log::trace!("uci features: {:?}", uci_x.as_slice());
        log::trace!("fram features: {:?}", fram_x.as_slice());
        ProbabilityPair {
            p_uci: self.uci.predict_probability_positive(&uci_x),
            p_fram: self.fram.predict_probability_positive(&fram_x),
        }
    }
}

/// Second-stage model over a [`ProbabilityPair`].
pub struct MetaBlender {
    model: Box<dyn ClassifierModel>,
    has_probability: bool,
}

impl MetaBlender {
    pub fn new(model: Box<dyn ClassifierModel>) -> Result<Self, ModelError> {
        let mut found: Vec<String> = model.feature_names().to_vec();
        let mut expected: Vec<String> = BLENDER_FEATURES.iter().map(|s| s.to_string()).collect();
        found.sort();
        expected.sort();
        if found != expected {
            return Err(ModelError::BlenderSchema {
                expected: BLENDER_FEATURES.iter().map(|s| s.to_string()).collect(),
                found: model.feature_names().to_vec(),
            });
        }

        let probe = Array1::<f64>::zeros(BLENDER_FEATURES.len());
        let has_probability = model.predict_proba(probe.view()).is_some();
        if !has_probability {
            log::warn!(
                "Meta model '{}' has no probability output; final scores will be class labels (0 or 1)",
                model.name()
            );
        }
        Ok(Self {
            model,
            has_probability,
        })
    }

    pub fn has_probability(&self) -> bool {
        self.has_probability
    }

    /// Final probability for one request. Falls back to the class label
    /// when the blender has no probability output.
    pub fn blend(&self, pair: &ProbabilityPair) -> f64 {
        let x: Array1<f64> = self
            .model
            .feature_names()
            .iter()
            .map(|name| pair.get(name).unwrap_or(0.0))
            .collect();
        self.score(x.view())
    }

    fn score(&self, x: ArrayView1<f64>) -> f64 {
        match self.model.predict_proba(x) {
            Some(p) => p,
            None => self.model.predict(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forest::{DecisionTree, RandomForestClassifier, TreeNode};
    use crate::models::linear::{LinearSvc, LogisticRegression};
    use crate::schema::NameMapping;
    use std::sync::Arc;

    fn single_leaf_forest(columns: &[&str], positive: f64) -> RandomForestClassifier {
        RandomForestClassifier {
            feature_names: columns.iter().map(|c| c.to_string()).collect(),
            feature_importances: vec![1.0 / columns.len() as f64; columns.len()],
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Leaf {
                    value: vec![1.0 - positive, positive],
                }],
            }],
        }
    }

    #[test]
    fn base_model_requires_importances_and_probability() {
        let svc = LinearSvc {
            feature_names: vec!["age".to_string()],
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        assert!(matches!(
            BaseModel::new("UCI", Box::new(svc)).err(),
            Some(ModelError::MissingImportances(_))
        ));

        let lr = LogisticRegression {
            feature_names: vec!["age".to_string()],
            coefficients: vec![1.0],
            intercept: 0.0,
            feature_importances: Some(vec![1.0]),
        };
        assert!(BaseModel::new("UCI", Box::new(lr)).is_ok());
    }

    #[test]
    fn pair_scores_both_models() {
        let pair = BaseModelPair::new(
            BaseModel::new("UCI", Box::new(single_leaf_forest(&["age", "sex"], 0.25))).unwrap(),
            BaseModel::new("Framingham", Box::new(single_leaf_forest(&["male"], 0.75))).unwrap(),
        );
        let reconciler = Reconciler::new(Arc::new(NameMapping::default()));
        let probs = pair.score(&reconciler, &UserInputRecord::new());
        assert_eq!(probs, ProbabilityPair { p_uci: 0.25, p_fram: 0.75 });
    }

    #[test]
    fn blender_reorders_inputs_by_name() {
        // Trained with p_fram first.
        let lr = LogisticRegression {
            feature_names: vec!["p_fram".to_string(), "p_uci".to_string()],
            coefficients: vec![0.0, 4.0],
            intercept: -2.0,
            feature_importances: None,
        };
        let blender = MetaBlender::new(Box::new(lr)).unwrap();
        assert!(blender.has_probability());
        let p = blender.blend(&ProbabilityPair { p_uci: 0.5, p_fram: 0.9 });
        assert_eq!(p, 0.5);
    }

    #[test]
    fn blender_falls_back_to_class_label() {
        let svc = LinearSvc {
            feature_names: vec!["p_uci".to_string(), "p_fram".to_string()],
            coefficients: vec![1.0, 1.0],
            intercept: -1.0,
        };
        let blender = MetaBlender::new(Box::new(svc)).unwrap();
        assert!(!blender.has_probability());
        assert_eq!(blender.blend(&ProbabilityPair { p_uci: 0.8, p_fram: 0.7 }), 1.0);
        assert_eq!(blender.blend(&ProbabilityPair { p_uci: 0.1, p_fram: 0.2 }), 0.0);
    }

    #[test]
    fn blender_rejects_foreign_schema() {
        let lr = LogisticRegression {
            feature_names: vec!["p_uci".to_string(), "p_other".to_string()],
            coefficients: vec![1.0, 1.0],
            intercept: 0.0,
            feature_importances: None,
        };
        assert!(matches!(
            MetaBlender::new(Box::new(lr)).err(),
            Some(ModelError::BlenderSchema { .. })
        ));
    }
}
