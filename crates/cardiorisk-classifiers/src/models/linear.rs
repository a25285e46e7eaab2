//! Linear blending models.
//!
//! `LogisticRegression` is the usual meta blender. `LinearSvc` has no
//! probabilistic output and only answers with a class, which exercises the
//! blender's class-label fallback.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::classifier_trait::ClassifierModel;

fn decision(coefficients: &[f64], intercept: f64, x: ArrayView1<f64>) -> f64 {
    coefficients
        .iter()
        .zip(x.iter())
        .fold(intercept, |acc, (w, v)| acc + w * v)
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn check_lengths(model: &str, names: usize, coefficients: usize) -> Result<(), ModelError> {
    if names == 0 {
        return Err(ModelError::EmptySchema(model.to_string()));
    }
    if names != coefficients {
        return Err(ModelError::LengthMismatch {
            model: model.to_string(),
            what: "coefficients",
            names,
            values: coefficients,
        });
    }
    Ok(())
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

impl LogisticRegression {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_lengths(self.name(), self.feature_names.len(), self.coefficients.len())?;
        if let Some(importances) = &self.feature_importances {
            if importances.len() != self.feature_names.len() {
                return Err(ModelError::LengthMismatch {
                    model: self.name().to_string(),
                    what: "feature importances",
                    names: self.feature_names.len(),
                    values: importances.len(),
                });
            }
        }
        Ok(())
    }
}

impl ClassifierModel for LogisticRegression {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, x: ArrayView1<f64>) -> f64 {
        if decision(&self.coefficients, self.intercept, x) > 0.0 {
            1.0
        } else {
            0.0
        }
    }

    fn predict_proba(&self, x: ArrayView1<f64>) -> Option<f64> {
        Some(sigmoid(decision(&self.coefficients, self.intercept, x)))
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LinearSvc {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearSvc {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_lengths(self.name(), self.feature_names.len(), self.coefficients.len())
    }
}

impl ClassifierModel for LinearSvc {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, x: ArrayView1<f64>) -> f64 {
        if decision(&self.coefficients, self.intercept, x) > 0.0 {
            1.0
        } else {
            0.0
        }
    }

    fn predict_proba(&self, _x: ArrayView1<f64>) -> Option<f64> {
        None
    }

    fn name(&self) -> &str {
        "linear_svc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn blender() -> LogisticRegression {
        LogisticRegression {
            feature_names: vec!["p_uci".to_string(), "p_fram".to_string()],
            coefficients: vec![2.0, 2.0],
            intercept: -2.0,
            feature_importances: None,
        }
    }

    #[test]
    fn logistic_probability_is_sigmoid_of_decision() {
        let model = blender();
        model.validate().unwrap();
        assert_eq!(model.predict_proba(array![0.5, 0.5].view()), Some(0.5));
        let p = model.predict_proba(array![1.0, 1.0].view()).unwrap();
        assert!((p - sigmoid(2.0)).abs() < 1e-12);
        assert_eq!(model.predict(array![0.5, 0.5].view()), 0.0);
        assert_eq!(model.predict(array![0.9, 0.5].view()), 1.0);
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0).is_finite());
    }

    #[test]
    fn svc_has_no_probability() {
        let model = LinearSvc {
            feature_names: vec!["p_uci".to_string(), "p_fram".to_string()],
            coefficients: vec![1.0, 1.0],
            intercept: -1.0,
        };
        model.validate().unwrap();
        assert_eq!(model.predict_proba(array![0.9, 0.9].view()), None);
        assert_eq!(model.predict(array![0.9, 0.9].view()), 1.0);
        assert_eq!(model.predict(array![0.2, 0.3].view()), 0.0);
    }

    #[test]
    fn coefficient_count_must_match() {
        let mut model = blender();
        model.coefficients.push(1.0);
        assert!(matches!(
            model.validate(),
            Err(ModelError::LengthMismatch { .. })
        ));
    }
}
