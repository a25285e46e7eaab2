use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Form fields collected by the input page, in page order.
pub const DEFAULT_FORM_FIELDS: [&str; 23] = [
    "age",
    "sex",
    "education",
    "currentSmoker",
    "cigsPerDay",
    "BPMeds",
    "prevalentStroke",
    "prevalentHyp",
    "diabetes",
    "BMI",
    "heartRate",
    "sysBP",
    "diaBP",
    "restingBpS",
    "maxHeartRate",
    "chestPainType",
    "cholesterol",
    "totChol",
    "fastingBloodSugar",
    "restingEcg",
    "exerciseAngina",
    "oldpeak",
    "stSlope",
];

/// Form field -> model column. The first block is the UCI schema, the second
/// the Framingham schema.
const DEFAULT_FORM_TO_MODEL: [(&str, &str); 23] = [
    ("age", "age"),
    ("sex", "sex"),
    ("chestPainType", "chest pain type"),
    ("restingBpS", "resting bp s"),
    ("cholesterol", "cholesterol"),
    ("fastingBloodSugar", "fasting blood sugar"),
    ("restingEcg", "resting ecg"),
    ("maxHeartRate", "max heart rate"),
    ("exerciseAngina", "exercise angina"),
    ("oldpeak", "oldpeak"),
    ("stSlope", "ST slope"),
    ("education", "education"),
    ("currentSmoker", "currentSmoker"),
    ("cigsPerDay", "cigsPerDay"),
    ("BPMeds", "BPMeds"),
    ("prevalentStroke", "prevalentStroke"),
    ("prevalentHyp", "prevalentHyp"),
    ("diabetes", "diabetes"),
    ("totChol", "totChol"),
    ("sysBP", "sysBP"),
    ("diaBP", "diaBP"),
    ("BMI", "BMI"),
    ("heartRate", "heartRate"),
];

/// Model column -> form field for columns whose meaning differs from any
/// mapped name. Framingham encodes sex as `male`.
const DEFAULT_ALIASES: [(&str, &str); 1] = [("male", "sex")];

/// Serialisable description of the form <-> model name tables.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FieldMappingConfig {
    /// Fields read from a form post, in page order.
    pub form_fields: Vec<String>,
    /// Form field name -> model column name.
    pub form_to_model: IndexMap<String, String>,
    /// Model column name -> form field name, consulted when the inverse of
    /// `form_to_model` has no entry for the column.
    pub aliases: IndexMap<String, String>,
}

impl Default for FieldMappingConfig {
    fn default() -> Self {
        Self {
            form_fields: DEFAULT_FORM_FIELDS.iter().map(|s| s.to_string()).collect(),
            form_to_model: DEFAULT_FORM_TO_MODEL
                .iter()
                .map(|(f, m)| (f.to_string(), m.to_string()))
                .collect(),
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(m, f)| (m.to_string(), f.to_string()))
                .collect(),
        }
    }
}

/// Immutable bidirectional name dictionary, built once at start-up.
#[derive(Debug, Clone)]
pub struct NameMapping {
    form_fields: Vec<String>,
    model_to_form: HashMap<String, String>,
    aliases: HashMap<String, String>,
}

impl NameMapping {
    pub fn from_config(config: &FieldMappingConfig) -> Self {
        // Later entries win when two form fields map to the same column.
        let mut model_to_form: HashMap<String, String> = config
            .form_to_model
            .iter()
            .map(|(form, model)| (model.clone(), form.clone()))
            .collect();
        for (model, form) in &config.aliases {
            model_to_form
                .entry(model.clone())
                .or_insert_with(|| form.clone());
        }

        Self {
            form_fields: config.form_fields.clone(),
            model_to_form,
            aliases: config
                .aliases
                .iter()
                .map(|(m, f)| (m.clone(), f.clone()))
                .collect(),
        }
    }

    pub fn form_fields(&self) -> &[String] {
        &self.form_fields
    }

    /// Form field behind a model column: the inverse mapping, aliases included.
    pub fn form_field(&self, column: &str) -> Option<&str> {
        self.model_to_form.get(column).map(String::as_str)
    }

    /// Hard-coded alias for a model column, if any.
    pub fn alias(&self, column: &str) -> Option<&str> {
        self.aliases.get(column).map(String::as_str)
    }

    pub fn is_form_field(&self, name: &str) -> bool {
        self.form_fields.iter().any(|f| f == name)
    }
}

impl Default for NameMapping {
    fn default() -> Self {
        Self::from_config(&FieldMappingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_mapping_translates_renamed_columns() {
        let mapping = NameMapping::default();
        assert_eq!(mapping.form_field("chest pain type"), Some("chestPainType"));
        assert_eq!(mapping.form_field("ST slope"), Some("stSlope"));
        assert_eq!(mapping.form_field("sysBP"), Some("sysBP"));
        assert_eq!(mapping.form_field("resting bp s"), Some("restingBpS"));
    }

    #[test]
    fn male_column_aliases_sex_field() {
        let mapping = NameMapping::default();
        assert_eq!(mapping.alias("male"), Some("sex"));
        assert_eq!(mapping.form_field("male"), Some("sex"));
        assert_eq!(mapping.alias("sex"), None);
    }

    #[test]
    fn alias_never_overrides_explicit_inverse() {
        let mut config = FieldMappingConfig::default();
        config.aliases.insert("age".to_string(), "sex".to_string());
        let mapping = NameMapping::from_config(&config);
        assert_eq!(mapping.form_field("age"), Some("age"));
    }

    #[test]
    fn glucose_has_no_form_field() {
        let mapping = NameMapping::default();
        assert_eq!(mapping.form_field("glucose"), None);
        assert!(!mapping.is_form_field("glucose"));
        assert_eq!(mapping.form_fields().len(), 23);
    }
}
