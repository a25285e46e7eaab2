//! Static health advice keyed by feature name.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::schema::NameMapping;

/// Key of the fallback entry in a tips table.
pub const DEFAULT_TIP_KEY: &str = "default";

const DEFAULT_TIP: &str =
    "Maintain a balanced diet, regular exercise, avoid smoking, and get routine health checks.";

const BUILTIN_TIPS: [(&str, &str); 26] = [
    ("default", DEFAULT_TIP),
    ("age", "Risk rises with age; schedule regular cardiovascular check-ups, especially after 45."),
    ("sex", "Men develop heart disease earlier on average; keep blood pressure and cholesterol under review."),
    ("male", "Men develop heart disease earlier on average; keep blood pressure and cholesterol under review."),
    ("chest pain type", "Report any chest pain to a doctor promptly, particularly pain brought on by exertion."),
    ("resting bp s", "Keep resting blood pressure below 120/80 mmHg: cut salt, stay active and limit alcohol."),
    ("cholesterol", "Lower cholesterol by eating less saturated fat, more fibre, and staying physically active."),
    ("totchol", "Lower total cholesterol by eating less saturated fat, more fibre, and staying physically active."),
    ("fasting blood sugar", "Keep fasting blood sugar in range through diet, activity and regular screening."),
    ("glucose", "Keep blood glucose in range through diet, activity and regular screening."),
    ("resting ecg", "An abnormal resting ECG deserves follow-up with a cardiologist."),
    ("max heart rate", "Build cardiovascular fitness gradually; ask a doctor before starting intense exercise."),
    ("exercise angina", "Chest pain during exercise needs medical evaluation before continuing training."),
    ("oldpeak", "ST depression on an ECG can signal reduced blood flow; discuss stress testing with a doctor."),
    ("st slope", "An abnormal ST slope should be reviewed by a cardiologist."),
    ("education", "Stay informed about heart health and keep up with preventive screenings."),
    ("currentsmoker", "Quitting smoking is the single most effective step to lower cardiovascular risk."),
    ("cigsperday", "Every cigarette counts; cutting down and quitting lowers risk quickly."),
    ("bpmeds", "Take blood pressure medication exactly as prescribed and review it regularly."),
    ("prevalentstroke", "After a stroke, follow secondary prevention closely: medication, blood pressure and activity."),
    ("prevalenthyp", "Manage hypertension with medication adherence, low salt intake and home monitoring."),
    ("sysbp", "Keep systolic pressure below 130 mmHg: cut salt, limit alcohol and stay active."),
    ("diabp", "Keep diastolic pressure below 80 mmHg; home monitoring helps track progress."),
    ("diabetes", "Control diabetes through diet, exercise and medication to protect your heart."),
    ("bmi", "Aim for a healthy weight; even a 5-10% loss improves blood pressure and cholesterol."),
    ("heartrate", "A high resting heart rate can improve with regular aerobic exercise and stress management."),
];

/// One tip attached to a ranked feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub feature: String,
    pub tip: String,
}

/// Advice table with a fallback chain for lookups.
#[derive(Debug, Clone)]
pub struct TipBook {
    tips: HashMap<String, String>,
}

impl TipBook {
    pub fn builtin() -> Self {
        Self {
            tips: BUILTIN_TIPS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Built-in tips overlaid with the JSON object stored at `path`.
    pub fn with_overrides<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read tips: {}", path.as_ref().display()))?;
        let extra: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse tips: {}", path.as_ref().display()))?;
        let mut book = Self::builtin();
        book.tips.extend(extra);
        Ok(book)
    }

    /// Exact name, lower-cased name, mapped form field, then the default.
    pub fn lookup(&self, feature: &str, mapping: &NameMapping) -> &str {
        let lower = feature.to_lowercase();
        let tip = [Some(feature), Some(lower.as_str()), mapping.form_field(feature)]
            .into_iter()
            .flatten()
            .find_map(|key| self.tips.get(key))
            .or_else(|| self.tips.get(DEFAULT_TIP_KEY))
            .map(String::as_str)
            .unwrap_or(DEFAULT_TIP);
        tip
    }

    pub fn tips_for<S: AsRef<str>>(&self, features: &[S], mapping: &NameMapping) -> Vec<Tip> {
        features
            .iter()
            .map(|f| Tip {
                feature: f.as_ref().to_string(),
                tip: self.lookup(f.as_ref(), mapping).to_string(),
            })
            .collect()
    }
}

impl Default for TipBook {
    fn default() -> Self {
        Self::builtin()
    }
}
