use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize_field;

/// Numeric user input keyed by form-field name, in insertion order.
///
/// Insertion order matters for the normalised-name fallback used when
/// pre-filling sliders: the first matching key wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserInputRecord {
    values: IndexMap<String, f64>,
}

impl UserInputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `fields` from a form, normalising each raw value.
    /// Fields the form does not carry are recorded as 0.
    pub fn from_form<'a, F>(fields: &[String], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let values = fields
            .iter()
            .map(|field| (field.clone(), normalize_field(lookup(field.as_str()))))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Insert or overwrite; an overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for UserInputRecord {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_form_fills_missing_fields_with_zero() {
        let fields = vec!["age".to_string(), "sex".to_string(), "BMI".to_string()];
        let record = UserInputRecord::from_form(&fields, |name| match name {
            "age" => Some("54"),
            "sex" => Some("yes"),
            _ => None,
        });
        assert_eq!(record.get("age"), Some(54.0));
        assert_eq!(record.get("sex"), Some(1.0));
        assert_eq!(record.get("BMI"), Some(0.0));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut record: UserInputRecord = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        record.insert("a", 5.0);
        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(5.0));
    }
}
