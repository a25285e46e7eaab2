//! Combined feature-importance ranking across both base models.

use indexmap::IndexMap;
use serde::Serialize;

/// Default number of features surfaced to the user.
pub const DEFAULT_TOP_N: usize = 10;

/// One ranked feature and its summed importance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFeature {
    pub name: String,
    pub importance: f64,
}

/// Feature names in descending combined importance.
///
/// Computed once when the models are loaded; importances are properties of
/// the models, not of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureImportanceRanking {
    features: Vec<RankedFeature>,
}

impl FeatureImportanceRanking {
    /// Sum importances by column name across `models`, each given as
    /// `(columns, importances)`, and keep the `top_n` highest.
    ///
    /// Ties keep first-seen order: the first model's columns in its order,
    /// then columns new to the second model.
    pub fn combine<'a, I>(models: I, top_n: usize) -> Self
    where
        I: IntoIterator<Item = (&'a [String], &'a [f64])>,
    {
        let mut combined: IndexMap<&str, f64> = IndexMap::new();
        for (columns, importances) in models {
            for (name, value) in columns.iter().zip(importances.iter()) {
                *combined.entry(name.as_str()).or_insert(0.0) += *value;
            }
        }

        let mut features: Vec<RankedFeature> = combined
            .into_iter()
            .map(|(name, importance)| RankedFeature {
                name: name.to_string(),
                importance,
            })
            .collect();
        // sort_by is stable, which gives the first-seen tie rule.
        features.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        features.truncate(top_n);

        Self { features }
    }

    pub fn features(&self) -> &[RankedFeature] {
        &self.features
    }

    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn sums_shared_columns_and_breaks_ties_by_first_seen() {
        let uci_cols = cols(&["a", "b"]);
        let uci_imp = vec![0.25, 0.2];
        let fram_cols = cols(&["a", "c"]);
        let fram_imp = vec![0.25, 0.5];

        let ranking = FeatureImportanceRanking::combine(
            [
                (uci_cols.as_slice(), uci_imp.as_slice()),
                (fram_cols.as_slice(), fram_imp.as_slice()),
            ],
            10,
        );
        assert_eq!(ranking.names(), vec!["a", "c", "b"]);
        assert_eq!(ranking.features()[0].importance, 0.5);
        assert_eq!(ranking.features()[1].importance, 0.5);
    }

    #[test]
    fn equal_combined_scores_keep_first_model_order() {
        let uci_cols = cols(&["a", "b"]);
        let uci_imp = vec![0.3, 0.2];
        let fram_cols = cols(&["a", "c"]);
        let fram_imp = vec![0.1, 0.4];

        let ranking = FeatureImportanceRanking::combine(
            [
                (uci_cols.as_slice(), uci_imp.as_slice()),
                (fram_cols.as_slice(), fram_imp.as_slice()),
            ],
            DEFAULT_TOP_N,
        );
        assert_eq!(ranking.names(), vec!["a", "c", "b"]);
        let scores: Vec<f64> = ranking.features().iter().map(|f| f.importance).collect();
        assert!((scores[0] - 0.4).abs() < 1e-12);
        assert!((scores[1] - 0.4).abs() < 1e-12);
        assert!((scores[2] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn truncates_to_top_n() {
        let names = cols(&["a", "b", "c", "d"]);
        let imp = vec![0.1, 0.4, 0.3, 0.2];
        let ranking =
            FeatureImportanceRanking::combine([(names.as_slice(), imp.as_slice())], 2);
        assert_eq!(ranking.names(), vec!["b", "c"]);
        assert_eq!(ranking.len(), 2);
    }

    #[test]
    fn empty_input_gives_empty_ranking() {
        let ranking = FeatureImportanceRanking::combine(
            std::iter::empty::<(&[String], &[f64])>(),
            DEFAULT_TOP_N,
        );
        assert!(ranking.is_empty());
    }
}
