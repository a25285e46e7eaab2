use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cardiorisk_classifiers::config::PredictorConfig;
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

/// Configuration for `cardiorisk serve` and `cardiorisk predict`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServeConfig {
    pub predictor: PredictorConfig,
    pub host: String,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            predictor: PredictorConfig::default(),
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServeConfig {
    /// Load `config_path` (or the defaults) and apply command line overrides.
    ///
    /// Only the overrides the subcommand defines are looked at.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_serve_config(path)?,
            None => ServeConfig::default(),
        };

        if let Some(model_dir) = argument::<PathBuf>(matches, "model_dir") {
            config.predictor.model_dir = model_dir;
        }
        if let Some(top_n) = argument::<usize>(matches, "top_n") {
            config.predictor.top_n = top_n;
        }
        if let Some(host) = argument::<String>(matches, "host") {
            config.host = host;
        }
        if let Some(port) = argument::<u16>(matches, "port") {
            config.port = port;
        }

        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn argument<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<T> {
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}

pub fn load_serve_config<P: AsRef<Path>>(path: P) -> Result<ServeConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ServeConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
