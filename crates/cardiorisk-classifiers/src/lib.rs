//! cardiorisk-classifiers: two-stage cardiovascular risk scoring.
//!
//! Raw form values are normalised into a [`schema::UserInputRecord`], split
//! into one feature vector per base model by the [`schema::Reconciler`],
//! scored by the two base classifiers and blended by a meta model. The
//! [`predictor::RiskPredictor`] ties the stages together and also produces
//! the importance ranking and health tips shown next to the score.
//!
//! Model artifacts are JSON documents (see [`models::factory`]); their
//! recorded feature names are the only schema contract.
pub mod config;
pub mod ensemble;
pub mod error;
pub mod explain;
pub mod io;
pub mod models;
pub mod normalize;
pub mod predictor;
pub mod report;
pub mod risk;
pub mod schema;
pub mod tips;
