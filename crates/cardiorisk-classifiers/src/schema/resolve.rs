//! Ordered lookup strategies for finding a model column's value.

use crate::schema::mapping::NameMapping;
use crate::schema::record::UserInputRecord;

/// One way of finding a record value for a model column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolver {
    /// Hard-coded column alias (`male` -> `sex`), only when the aliased field
    /// is present in the record.
    Alias,
    /// Inverse form mapping. A mapped column claims its form field: the
    /// field's value is used, or 0 when the record lacks it.
    Mapped,
    /// Inverse form mapping, only when the mapped field is present.
    MappedPresent,
    /// The column name itself used as a record key.
    Identity,
    /// Match ignoring spaces and case against record keys, in record order.
    Normalized,
}

impl Resolver {
    pub fn resolve(
        self,
        column: &str,
        record: &UserInputRecord,
        mapping: &NameMapping,
    ) -> Option<f64> {
        match self {
            Resolver::Alias => mapping.alias(column).and_then(|field| record.get(field)),
            Resolver::Mapped => mapping
                .form_field(column)
                .map(|field| record.get(field).unwrap_or(0.0)),
            Resolver::MappedPresent => mapping
                .form_field(column)
                .and_then(|field| record.get(field)),
            Resolver::Identity => record.get(column),
            Resolver::Normalized => {
                let target = normalize_name(column);
                record
                    .iter()
                    .find(|(key, _)| normalize_name(key) == target)
                    .map(|(_, value)| value)
            }
        }
    }
}

/// Strip spaces and lower-case, so `resting bp s` matches `restingBpS`.
pub fn normalize_name(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}

/// Strategies evaluated in order; the first that yields a value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionChain {
    steps: Vec<Resolver>,
}

impl ResolutionChain {
    pub fn new(steps: impl Into<Vec<Resolver>>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    /// Chain used to fill model feature vectors.
    pub fn feature_vector() -> Self {
        Self::new([Resolver::Alias, Resolver::Mapped, Resolver::Identity])
    }

    /// Chain used to show the current value of a ranked feature.
    pub fn display_value() -> Self {
        Self::new([
            Resolver::MappedPresent,
            Resolver::Alias,
            Resolver::Normalized,
        ])
    }

    pub fn resolve(
        &self,
        column: &str,
        record: &UserInputRecord,
        mapping: &NameMapping,
    ) -> Option<f64> {
        self.steps
            .iter()
            .find_map(|step| step.resolve(column, record, mapping))
    }

    /// Resolve, defaulting to 0 when every step misses.
    pub fn resolve_or_zero(
        &self,
        column: &str,
        record: &UserInputRecord,
        mapping: &NameMapping,
    ) -> f64 {
        self.resolve(column, record, mapping).unwrap_or(0.0)
    }
}
