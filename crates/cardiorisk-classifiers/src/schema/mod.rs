//! Reconciliation of the single form schema with the two model schemas.
//!
//! The form collects one flat set of fields; each base model was trained on
//! its own column names and order. [`mapping::NameMapping`] holds the static
//! dictionaries between the two worlds, [`resolve::ResolutionChain`] defines
//! how a model column finds its value, and [`reconcile::Reconciler`] builds
//! the per-model feature vectors.
pub mod mapping;
pub mod reconcile;
pub mod record;
pub mod resolve;

pub use mapping::{FieldMappingConfig, NameMapping};
pub use reconcile::{ModelFeatureVector, Reconciler};
pub use record::UserInputRecord;
pub use resolve::{ResolutionChain, Resolver};
