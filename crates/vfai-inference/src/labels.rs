//! Label normalization.
//!
//! Classifier endpoints disagree wildly on label vocabulary: "FAKE",
//! "artificial", "Human", "REAL", "LABEL_0". This module maps whatever a
//! model returned into the canonical (ai_score, real_score) pair.

use tracing::debug;
use vfai_models::{NormalizedScore, RawPrediction};

/// Keywords marking a label as "machine-generated".
const MACHINE_KEYWORDS: &[&str] = &["fake", "ai", "gan", "generated", "synthetic", "artificial"];

/// Keywords marking a label as "human-produced".
const AUTHENTIC_KEYWORDS: &[&str] = &["real", "human", "natural", "authentic", "original"];

/// Normalize a non-empty prediction list into a score pair.
///
/// Each prediction's label is bucketed by case-insensitive keyword match;
/// each bucket keeps the maximum score over its matches, so duplicate
/// labels never inflate a score. When neither bucket matched anything, the
/// single highest-scoring prediction is interpreted heuristically. A summed
/// score above 1 is rescaled into a probability pair; a sum below
/// `low_signal_threshold` collapses to the neutral pair, signalling
/// "answered but no usable signal".
///
/// Callers guarantee at least one prediction; an endpoint response with
/// zero predictions must be rejected at the invoker as malformed.
pub fn normalize_predictions(
    predictions: &[RawPrediction],
    low_signal_threshold: f64,
) -> NormalizedScore {
    debug_assert!(
        !predictions.is_empty(),
        "normalizer requires at least one prediction"
    );

    let mut ai_score: f64 = 0.0;
    let mut real_score: f64 = 0.0;

    for prediction in predictions {
        let label = prediction.label.to_lowercase();
        if matches_any(&label, MACHINE_KEYWORDS) {
            ai_score = ai_score.max(prediction.score);
        } else if matches_any(&label, AUTHENTIC_KEYWORDS) {
            real_score = real_score.max(prediction.score);
        }
    }

    // Nothing matched either bucket: read the top prediction heuristically
    if ai_score == 0.0 && real_score == 0.0 {
        if let Some(top) = predictions
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
        {
            let label = top.label.to_lowercase();
            if matches_any(&label, MACHINE_KEYWORDS) {
                ai_score = top.score;
                real_score = 1.0 - top.score;
            } else {
                real_score = top.score;
                ai_score = 1.0 - top.score;
            }
            debug!(
                label = %top.label,
                score = top.score,
                "No bucket match, interpreted top prediction heuristically"
            );
        }
    }

    let total = ai_score + real_score;
    if total > 1.0 {
        ai_score /= total;
        real_score /= total;
    } else if total < low_signal_threshold {
        debug!(total, "Scores below low-signal threshold, reporting neutral");
        return NormalizedScore::neutral();
    }

    NormalizedScore::new(ai_score, real_score)
}

fn matches_any(label: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| label.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW_SIGNAL: f64 = 0.1;

    fn prediction(label: &str, score: f64) -> RawPrediction {
        RawPrediction {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn test_bucket_matching() {
        let score = normalize_predictions(
            &[prediction("REAL", 0.8), prediction("FAKE", 0.3)],
            LOW_SIGNAL,
        );
        assert!((score.ai_score - 0.3).abs() < 1e-9);
        assert!((score.real_score - 0.8).abs() < 1e-9);
        assert!(!score.is_ai());
        assert!((score.confidence() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_labels_take_max_not_sum() {
        let score = normalize_predictions(
            &[
                prediction("fake", 0.4),
                prediction("fake", 0.6),
                prediction("fake", 0.2),
            ],
            LOW_SIGNAL,
        );
        assert!((score.ai_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_when_sum_exceeds_one() {
        let score = normalize_predictions(
            &[prediction("artificial", 0.9), prediction("human", 0.9)],
            LOW_SIGNAL,
        );
        assert!((score.ai_score - 0.5).abs() < 1e-9);
        assert!((score.real_score - 0.5).abs() < 1e-9);
        assert!(score.ai_score + score.real_score <= 1.0 + 1e-9);
    }

    #[test]
    fn test_low_signal_collapses_to_neutral() {
        let score = normalize_predictions(
            &[prediction("fake", 0.03), prediction("real", 0.04)],
            LOW_SIGNAL,
        );
        assert_eq!(score, NormalizedScore::neutral());
    }

    #[test]
    fn test_heuristic_fallback_for_unknown_labels() {
        let score = normalize_predictions(
            &[prediction("LABEL_0", 0.7), prediction("LABEL_1", 0.3)],
            LOW_SIGNAL,
        );
        // Unknown top label reads as authentic with its complement as ai
        assert!((score.real_score - 0.7).abs() < 1e-9);
        assert!((score.ai_score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_neutral_is_a_fixed_point() {
        // Feeding the neutral pair back through renormalization changes nothing
        let score = normalize_predictions(
            &[prediction("fake", 0.5), prediction("real", 0.5)],
            LOW_SIGNAL,
        );
        assert_eq!(score, NormalizedScore::new(0.5, 0.5));
    }

    #[test]
    fn test_invariants_hold_across_inputs() {
        let cases: Vec<Vec<RawPrediction>> = vec![
            vec![prediction("FAKE", 1.0)],
            vec![prediction("ai generated", 0.51), prediction("human", 0.52)],
            vec![prediction("gibberish", 0.2)],
            vec![prediction("natural", 0.05)],
        ];
        for predictions in &cases {
            let score = normalize_predictions(predictions, LOW_SIGNAL);
            assert!((0.0..=1.0).contains(&score.ai_score));
            assert!((0.0..=1.0).contains(&score.real_score));
            let neutral = score == NormalizedScore::neutral();
            assert!(score.ai_score + score.real_score <= 1.0 + 1e-9 || neutral);
        }
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        let score = normalize_predictions(&[prediction("Synthetic-Media", 0.9)], LOW_SIGNAL);
        assert!(score.is_ai());
        assert!((score.ai_score - 0.9).abs() < 1e-9);
    }
}
