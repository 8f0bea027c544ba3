//! Terminal rendering for feature rows and predictions.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use churnlens_ai::Prediction;
use churnlens_core::FeatureVector;

/// The encoded row as a `feature | value` table, one line per feature.
pub fn feature_table(v: &FeatureVector) -> anyhow::Result<String> {
    let (names, values): (Vec<&str>, Vec<f64>) = v.iter().unzip();
    let batch = RecordBatch::try_from_iter([
        ("feature", Arc::new(StringArray::from(names)) as ArrayRef),
        ("value", Arc::new(Float64Array::from(values)) as ArrayRef),
    ])?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// The encoded row exactly as the model sees it: one row, 19 columns.
pub fn wide_table(v: &FeatureVector) -> anyhow::Result<String> {
    let batch = v.to_record_batch()?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// One-line prediction summary.
pub fn prediction_line(p: &Prediction, model: &str) -> String {
    format!(
        "{} (confidence {}, model {model})",
        p.label.headline(),
        p.confidence_display()
    )
}
