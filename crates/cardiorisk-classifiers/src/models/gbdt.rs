use std::path::{Path, PathBuf};

use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::classifier_trait::ClassifierModel;

/// Artifact wrapper around a model saved by the `gbdt` crate.
///
/// `gbdt` stores trees only, so the column names and importances travel in
/// this wrapper. `model_file` is resolved relative to the wrapper's folder.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GbdtArtifact {
    pub feature_names: Vec<String>,
    pub feature_importances: Vec<f64>,
    pub model_file: PathBuf,
}

/// Gradient Boosting Decision Tree (GBDT) classifier trained with the
/// `LogLikelyhood` loss, whose predictions are already probabilities.
pub struct GBDTClassifier {
    model: GBDT,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl GBDTClassifier {
    pub fn load(artifact: GbdtArtifact, base_dir: &Path) -> Result<Self, ModelError> {
        if artifact.feature_names.is_empty() {
            return Err(ModelError::EmptySchema("gbdt".to_string()));
        }
        if artifact.feature_importances.len() != artifact.feature_names.len() {
            return Err(ModelError::LengthMismatch {
                model: "gbdt".to_string(),
                what: "feature importances",
                names: artifact.feature_names.len(),
                values: artifact.feature_importances.len(),
            });
        }

        let path = base_dir.join(&artifact.model_file);
        let model = GBDT::load_model(&path.to_string_lossy()).map_err(|e| ModelError::Gbdt {
            path: path.clone(),
            message: e.to_string(),
        })?;
        log::debug!("Loaded gbdt model from {}", path.display());

        Ok(GBDTClassifier {
            model,
            feature_names: artifact.feature_names,
            feature_importances: artifact.feature_importances,
        })
    }

    fn score(&self, x: ArrayView1<f64>) -> f64 {
        let row: Vec<ValueType> = x.iter().map(|v| *v as ValueType).collect();
        let test_x: DataVec = vec![Data::new_test_data(row, None)];
        let predictions = self.model.predict(&test_x);
        predictions
            .first()
            .map(|p| (*p as f64).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

impl ClassifierModel for GBDTClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, x: ArrayView1<f64>) -> f64 {
        if self.score(x) > 0.5 {
            1.0
        } else {
            0.0
        }
    }

    fn predict_proba(&self, x: ArrayView1<f64>) -> Option<f64> {
        Some(self.score(x))
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        Some(&self.feature_importances)
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
