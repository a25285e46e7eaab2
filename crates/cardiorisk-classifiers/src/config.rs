use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::explain::DEFAULT_TOP_N;
use crate::schema::FieldMappingConfig;

/// Informational page linked from every result.
pub const WHO_LINK: &str =
    "https://www.who.int/news-room/fact-sheets/detail/cardiovascular-diseases-(cvds)";

/// Everything needed to assemble a [`crate::predictor::RiskPredictor`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PredictorConfig {
    /// Folder holding the three model artifacts.
    pub model_dir: PathBuf,
    /// UCI base model artifact, relative to `model_dir` unless absolute.
    pub uci_model: PathBuf,
    /// Framingham base model artifact.
    pub fram_model: PathBuf,
    /// Meta blender artifact.
    pub meta_model: PathBuf,
    /// Number of ranked features shown with the result.
    pub top_n: usize,
    pub reference_link: String,
    /// Optional JSON object of extra tips, merged over the built-in table.
    pub tips_file: Option<PathBuf>,
    pub mapping: FieldMappingConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
            uci_model: PathBuf::from("model_uci.json"),
            fram_model: PathBuf::from("model_fram.json"),
            meta_model: PathBuf::from("meta_model.json"),
            top_n: DEFAULT_TOP_N,
            reference_link: WHO_LINK.to_string(),
            tips_file: None,
            mapping: FieldMappingConfig::default(),
        }
    }
}

impl PredictorConfig {
    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.model_dir.join(file)
        }
    }

    pub fn uci_path(&self) -> PathBuf {
        self.resolve(&self.uci_model)
    }

    pub fn fram_path(&self) -> PathBuf {
        self.resolve(&self.fram_model)
    }

    pub fn meta_path(&self) -> PathBuf {
        self.resolve(&self.meta_model)
    }
}

/// Load a predictor configuration from a JSON file.
pub fn load_predictor_config<P: AsRef<Path>>(path: P) -> Result<PredictorConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: PredictorConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
