use std::sync::Arc;

use ndarray::Array1;

use crate::schema::mapping::NameMapping;
use crate::schema::record::UserInputRecord;
use crate::schema::resolve::ResolutionChain;

/// Feature values aligned to one model's training-time column order.
pub type ModelFeatureVector = Array1<f64>;

/// Builds per-model feature vectors from a [`UserInputRecord`].
///
/// Column lists are always passed in from the loaded model so the vector
/// layout follows whatever artifact is on disk.
#[derive(Debug, Clone)]
pub struct Reconciler {
    mapping: Arc<NameMapping>,
    chain: ResolutionChain,
}

impl Reconciler {
    pub fn new(mapping: Arc<NameMapping>) -> Self {
        Self {
            mapping,
            chain: ResolutionChain::feature_vector(),
        }
    }

    pub fn mapping(&self) -> &NameMapping {
        &self.mapping
    }

    /// One value per column, in column order; every column gets a value.
    pub fn build(&self, columns: &[String], record: &UserInputRecord) -> ModelFeatureVector {
        columns
            .iter()
            .map(|column| self.chain.resolve_or_zero(column, record, &self.mapping))
            .collect()
    }

    /// Columns that no form field can ever reach; they always score as 0.
    pub fn unreachable_columns<'a>(&self, columns: &'a [String]) -> Vec<&'a str> {
        columns
            .iter()
            .filter(|column| !self.is_reachable(column))
            .map(String::as_str)
            .collect()
    }

    fn is_reachable(&self, column: &str) -> bool {
        let mapping = &self.mapping;
        mapping
            .form_field(column)
            .map(|field| mapping.is_form_field(field))
            .unwrap_or(false)
            || mapping
                .alias(column)
                .map(|field| mapping.is_form_field(field))
                .unwrap_or(false)
            || mapping.is_form_field(column)
    }
}
