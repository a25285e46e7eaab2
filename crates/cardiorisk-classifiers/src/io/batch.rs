//! CSV/TSV batch scoring files.
//!
//! Input headers may be form-field names or model-column names; values are
//! normalised exactly like form input. Output has one row per input row.
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::normalize::normalize_str;
use crate::predictor::{round4, Prediction};
use crate::schema::{NameMapping, UserInputRecord};

#[derive(Debug, Serialize)]
struct ScoredRow<'a> {
    row: usize,
    uci_prob: f64,
    fram_prob: f64,
    final_prob: f64,
    final_cat: &'a str,
}

fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("tsv") => b'\t',
        _ => b',',
    }
}

/// Read one [`UserInputRecord`] per data row.
pub fn read_records_csv<P: AsRef<Path>>(
    path: P,
    mapping: &NameMapping,
) -> Result<Vec<UserInputRecord>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .clone();
    let keys: Vec<String> = headers
        .iter()
        .map(|h| mapping.form_field(h).unwrap_or(h).to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Failed to read row {}", idx + 1))?;
        let record: UserInputRecord = keys
            .iter()
            .zip(row.iter())
            .map(|(key, raw)| (key.as_str(), normalize_str(raw)))
            .collect();
        records.push(record);
    }
    log::info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write predictions as CSV, rounding probabilities to 4 decimals.
pub fn write_predictions_csv<W: Write>(writer: W, predictions: &[Prediction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (idx, prediction) in predictions.iter().enumerate() {
        wtr.serialize(ScoredRow {
            row: idx + 1,
            uci_prob: round4(prediction.probabilities.p_uci),
            fram_prob: round4(prediction.probabilities.p_fram),
            final_prob: round4(prediction.final_prob),
            final_cat: prediction.final_cat.label(),
        })
        .context("Failed to write prediction row")?;
    }
    wtr.flush().context("Failed to flush predictions")?;
    Ok(())
}
