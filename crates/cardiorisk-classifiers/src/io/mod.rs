//! Batch input/output helpers.
pub mod batch;

pub use batch::{read_records_csv, write_predictions_csv};
