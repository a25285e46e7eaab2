//! Pre-trained classifiers and the artifact formats they load from.
pub mod classifier_trait;
pub mod factory;
pub mod forest;
pub mod gbdt;
pub mod linear;

pub use classifier_trait::ClassifierModel;
pub use factory::{build_model, load_model, ModelArtifact};
