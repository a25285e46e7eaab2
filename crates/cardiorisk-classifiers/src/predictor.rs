//! End-to-end scoring: record in, score, category, ranking and tips out.

use std::sync::Arc;

use anyhow::Result;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PredictorConfig;
use crate::ensemble::{BaseModel, BaseModelPair, MetaBlender, ProbabilityPair};
use crate::error::ModelError;
use crate::explain::FeatureImportanceRanking;
use crate::models::{load_model, ClassifierModel};
use crate::normalize::normalize_json;
use crate::risk::RiskCategory;
use crate::schema::{NameMapping, Reconciler, ResolutionChain, UserInputRecord};
use crate::tips::{Tip, TipBook};

/// Round to 4 decimals, the precision reported to clients.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Incremental-update request: a base record plus a slider overlay.
///
/// Overlay keys may be form fields or model columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncrementalRequest {
    #[serde(default)]
    pub base_inputs: IndexMap<String, Value>,
    #[serde(default)]
    pub modified: IndexMap<String, Value>,
}

impl IncrementalRequest {
    /// Merge base and overlay; overlay wins. Model-column keys in the overlay
    /// are translated to their form field first.
    pub fn into_record(&self, mapping: &NameMapping) -> UserInputRecord {
        let mut merged = UserInputRecord::new();
        for (key, value) in &self.base_inputs {
            merged.insert(key.as_str(), normalize_json(value));
        }
        for (key, value) in &self.modified {
            let target = mapping.form_field(key).unwrap_or(key.as_str());
            merged.insert(target, normalize_json(value));
        }
        merged
    }
}

/// A ranked feature together with the value the user entered for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureValue {
    pub name: String,
    pub value: f64,
}

/// Full result of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub probabilities: ProbabilityPair,
    pub final_prob: f64,
    pub final_cat: RiskCategory,
    pub top_features: Vec<String>,
    pub top_features_values: Vec<FeatureValue>,
    pub tips: Vec<Tip>,
    pub base_inputs: UserInputRecord,
}

/// JSON body returned for incremental updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub uci_prob: f64,
    pub fram_prob: f64,
    pub final_prob: f64,
    pub final_cat: RiskCategory,
    pub top_features: Vec<String>,
    pub tips: Vec<Tip>,
}

impl Prediction {
    pub fn summary(&self) -> PredictionSummary {
        PredictionSummary {
            uci_prob: round4(self.probabilities.p_uci),
            fram_prob: round4(self.probabilities.p_fram),
            final_prob: round4(self.final_prob),
            final_cat: self.final_cat,
            top_features: self.top_features.clone(),
            tips: self.tips.clone(),
        }
    }
}

/// Loaded models plus every static table the pipeline reads.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct RiskPredictor {
    mapping: Arc<NameMapping>,
    reconciler: Reconciler,
    display_chain: ResolutionChain,
    models: BaseModelPair,
    blender: MetaBlender,
    ranking: FeatureImportanceRanking,
    tips: TipBook,
    reference_link: String,
}

impl RiskPredictor {
    /// Load the three artifacts named by `config`. Any missing or malformed
    /// artifact is an error; there is no partial model set.
    pub fn load(config: &PredictorConfig) -> Result<Self> {
        let artifacts = [
            ("UCI", config.uci_path()),
            ("Framingham", config.fram_path()),
            ("Meta", config.meta_path()),
        ];
        for (role, path) in &artifacts {
            if !path.is_file() {
                return Err(ModelError::MissingArtifact {
                    role: *role,
                    path: path.clone(),
                }
                .into());
            }
        }

        let uci = load_model(&artifacts[0].1, "UCI")?;
        let fram = load_model(&artifacts[1].1, "Framingham")?;
        let meta = load_model(&artifacts[2].1, "Meta")?;

        let tips = match &config.tips_file {
            Some(path) => TipBook::with_overrides(path)?,
            None => TipBook::builtin(),
        };

        let predictor = Self::from_models(
            uci,
            fram,
            meta,
            NameMapping::from_config(&config.mapping),
            tips,
            config.top_n,
            config.reference_link.clone(),
        )?;
        Ok(predictor)
    }

    pub fn from_models(
        uci: Box<dyn ClassifierModel>,
        fram: Box<dyn ClassifierModel>,
        meta: Box<dyn ClassifierModel>,
        mapping: NameMapping,
        tips: TipBook,
        top_n: usize,
        reference_link: String,
    ) -> Result<Self, ModelError> {
        let models = BaseModelPair::new(
            BaseModel::new("UCI", uci)?,
            BaseModel::new("Framingham", fram)?,
        );
        let blender = MetaBlender::new(meta)?;

        let mapping = Arc::new(mapping);
        let reconciler = Reconciler::new(Arc::clone(&mapping));
        for model in [&models.uci, &models.fram] {
            for column in reconciler.unreachable_columns(model.columns()) {
                log::warn!(
                    "{} column '{}' has no form field and will always be 0",
                    model.role(),
                    column
                );
            }
        }

        let ranking = FeatureImportanceRanking::combine(
            [
                (models.uci.columns(), models.uci.feature_importances()),
                (models.fram.columns(), models.fram.feature_importances()),
            ],
            top_n,
        );
        log::info!("Top features: {:?}", ranking.names());

        Ok(Self {
            mapping,
            reconciler,
            display_chain: ResolutionChain::display_value(),
            models,
            blender,
            ranking,
            tips,
            reference_link,
        })
    }

    pub fn mapping(&self) -> &NameMapping {
        &self.mapping
    }

    pub fn form_fields(&self) -> &[String] {
        self.mapping.form_fields()
    }

    pub fn ranking(&self) -> &FeatureImportanceRanking {
        &self.ranking
    }

    pub fn reference_link(&self) -> &str {
        &self.reference_link
    }

    pub fn uci_columns(&self) -> &[String] {
        self.models.uci.columns()
    }

    pub fn fram_columns(&self) -> &[String] {
        self.models.fram.columns()
    }

    /// Build a record from a form post, reading every configured form field.
    pub fn record_from_form<'a, F>(&self, lookup: F) -> UserInputRecord
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        UserInputRecord::from_form(self.mapping.form_fields(), lookup)
    }

    /// Base probabilities and the blended final probability.
    pub fn score(&self, record: &UserInputRecord) -> (ProbabilityPair, f64) {
        let probabilities = self.models.score(&self.reconciler, record);
        let final_prob = self.blender.blend(&probabilities);
        (probabilities, final_prob)
    }

    pub fn predict(&self, record: UserInputRecord) -> Prediction {
        let (probabilities, final_prob) = self.score(&record);
        let final_cat = RiskCategory::from_probability(final_prob);

        let top_features = self.ranking.names();
        let top_features_values = top_features
            .iter()
            .map(|name| FeatureValue {
                name: name.clone(),
                value: self
                    .display_chain
                    .resolve_or_zero(name, &record, &self.mapping),
            })
            .collect();
        let tips = self.tips.tips_for(&top_features, &self.mapping);

        log::debug!(
            "p_uci={:.4} p_fram={:.4} final={:.4} ({})",
            probabilities.p_uci,
            probabilities.p_fram,
            final_prob,
            final_cat
        );

        Prediction {
            probabilities,
            final_prob,
            final_cat,
            top_features,
            top_features_values,
            tips,
            base_inputs: record,
        }
    }

    /// Same pipeline as a fresh request, on the merged overlay record.
    pub fn predict_incremental(&self, request: &IncrementalRequest) -> Prediction {
        self.predict(request.into_record(&self.mapping))
    }

    /// Score many records in parallel; output order follows input order.
    pub fn predict_batch(&self, records: Vec<UserInputRecord>) -> Vec<Prediction> {
        records
            .into_par_iter()
            .map(|record| self.predict(record))
            .collect()
    }
}
