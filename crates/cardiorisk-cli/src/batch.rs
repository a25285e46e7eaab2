use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cardiorisk_classifiers::config::PredictorConfig;
use cardiorisk_classifiers::io::{read_records_csv, write_predictions_csv};
use cardiorisk_classifiers::predictor::RiskPredictor;

/// Score every row of `input` and write one result row per input row to
/// `output`, or stdout when no output path is given. Returns the row count.
pub fn run_batch_predict(
    input: &Path,
    output: Option<&Path>,
    config: &PredictorConfig,
) -> Result<usize> {
    let predictor = RiskPredictor::load(config)?;
    let records = read_records_csv(input, predictor.mapping())?;
    log::info!(
        "[cardiorisk::predict] Scoring {} rows from {:?}",
        records.len(),
        input
    );

    let predictions = predictor.predict_batch(records);

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_predictions_csv(writer, &predictions)?;

    Ok(predictions.len())
}
