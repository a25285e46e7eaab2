use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while loading or validating model artifacts.
///
/// All of these are start-up errors: the service refuses to run with a
/// partial or inconsistent model set.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{role} model not found at {}", path.display())]
    MissingArtifact { role: &'static str, path: PathBuf },

    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model '{model}' records {names} feature names but {values} {what}")]
    LengthMismatch {
        model: String,
        what: &'static str,
        names: usize,
        values: usize,
    },

    #[error("model '{model}' has an invalid tree {tree}: {reason}")]
    InvalidTree {
        model: String,
        tree: usize,
        reason: String,
    },

    #[error("base model '{0}' does not report feature importances")]
    MissingImportances(String),

    #[error("base model '{0}' has no probability output")]
    MissingProbability(String),

    #[error("meta model expects features {expected:?} but records {found:?}")]
    BlenderSchema {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("gbdt model {}: {message}", path.display())]
    Gbdt { path: PathBuf, message: String },

    #[error("model '{0}' records no feature names")]
    EmptySchema(String),
}
