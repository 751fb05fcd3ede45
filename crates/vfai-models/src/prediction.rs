//! Raw endpoint predictions.

use serde::Deserialize;

/// One (label, score) pair exactly as returned by a classifier endpoint.
///
/// Labels are free-form and inconsistent across models ("FAKE", "artificial",
/// "LABEL_0", ...); the normalizer is responsible for mapping them into the
/// canonical score space. Predictions are transient and consumed immediately.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPrediction {
    /// Label string as reported by the model
    pub label: String,
    /// Score in [0, 1] as reported by the model
    pub score: f64,
}
