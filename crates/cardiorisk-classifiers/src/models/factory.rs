//! Loading model artifacts from disk.
//!
//! Artifacts are JSON documents tagged by `kind`:
//!
//! ```json
//! {"kind": "random_forest", "feature_names": [...], "feature_importances": [...], "trees": [...]}
//! {"kind": "gbdt", "feature_names": [...], "feature_importances": [...], "model_file": "uci.gbdt"}
//! {"kind": "logistic_regression", "feature_names": ["p_uci", "p_fram"], "coefficients": [...], "intercept": 0.0}
//! {"kind": "linear_svc", "feature_names": ["p_uci", "p_fram"], "coefficients": [...], "intercept": 0.0}
//! ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::forest::RandomForestClassifier;
use crate::models::gbdt::{GBDTClassifier, GbdtArtifact};
use crate::models::linear::{LinearSvc, LogisticRegression};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForestClassifier),
    Gbdt(GbdtArtifact),
    LogisticRegression(LogisticRegression),
    LinearSvc(LinearSvc),
}

/// Validate an artifact and turn it into a boxed classifier.
/// `base_dir` resolves files an artifact refers to.
pub fn build_model(
    artifact: ModelArtifact,
    base_dir: &Path,
) -> Result<Box<dyn ClassifierModel>, ModelError> {
    match artifact {
        ModelArtifact::RandomForest(model) => {
            model.validate()?;
            Ok(Box::new(model))
        }
        ModelArtifact::Gbdt(artifact) => Ok(Box::new(GBDTClassifier::load(artifact, base_dir)?)),
        ModelArtifact::LogisticRegression(model) => {
            model.validate()?;
            Ok(Box::new(model))
        }
        ModelArtifact::LinearSvc(model) => {
            model.validate()?;
            Ok(Box::new(model))
        }
    }
}

/// Read, parse and validate the artifact at `path`.
///
/// `role` names the artifact in error messages ("UCI", "Framingham", "Meta").
pub fn load_model(
    path: &Path,
    role: &'static str,
) -> Result<Box<dyn ClassifierModel>, ModelError> {
    if !path.is_file() {
        return Err(ModelError::MissingArtifact {
            role,
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ModelArtifact =
        serde_json::from_str(&content).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let model = build_model(artifact, base_dir)?;
    log::info!(
        "Loaded {} model ({}, {} features) from {}",
        role,
        model.name(),
        model.feature_names().len(),
        path.display()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn missing_file_is_reported_with_role() {
        let err = load_model(Path::new("/nonexistent/model_uci.json"), "UCI")
            .err()
            .expect("missing artifact must fail");
        assert!(matches!(err, ModelError::MissingArtifact { role: "UCI", .. }));
        assert!(err.to_string().contains("UCI model not found"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta_model.json");
        std::fs::write(&path, "{\"kind\": \"random_forest\"").unwrap();
        assert!(matches!(
            load_model(&path, "Meta"),
            Err(ModelError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta_model.json");
        std::fs::write(&path, r#"{"kind": "neural_net", "layers": []}"#).unwrap();
        assert!(matches!(
            load_model(&path, "Meta"),
            Err(ModelError::Parse { .. })
        ));
    }

    #[test]
    fn loads_tagged_logistic_regression() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta_model.json");
        std::fs::write(
            &path,
            r#"{"kind": "logistic_regression", "feature_names": ["p_uci", "p_fram"],
                "coefficients": [1.0, 1.0], "intercept": -1.0}"#,
        )
        .unwrap();
        let model = load_model(&path, "Meta").unwrap();
        assert_eq!(model.name(), "logistic_regression");
        assert_eq!(model.predict_proba(array![0.5, 0.5].view()), Some(0.5));
    }

    #[test]
    fn invalid_forest_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_uci.json");
        std::fs::write(
            &path,
            r#"{"kind": "random_forest", "feature_names": ["age"], "feature_importances": [1.0],
                "trees": [{"nodes": [{"feature": 3, "threshold": 1.0, "left": 1, "right": 2},
                                     {"value": [1, 0]}, {"value": [0, 1]}]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            load_model(&path, "UCI"),
            Err(ModelError::InvalidTree { .. })
        ));
    }
}
