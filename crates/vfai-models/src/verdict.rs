//! Verdicts and normalized scores.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A machine/authentic probability pair derived from a model's raw output.
///
/// Invariant: both components are in [0, 1], and after normalization their
/// sum is at most 1 unless both carry the neutral 0.5 fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedScore {
    /// Probability-like score that the content is machine-generated
    pub ai_score: f64,
    /// Probability-like score that the content is human-produced
    pub real_score: f64,
}

impl NormalizedScore {
    /// Create a score pair.
    pub fn new(ai_score: f64, real_score: f64) -> Self {
        Self {
            ai_score,
            real_score,
        }
    }

    /// The neutral pair signalling "no usable signal".
    pub fn neutral() -> Self {
        Self {
            ai_score: 0.5,
            real_score: 0.5,
        }
    }

    /// Decision derived from the pair.
    pub fn is_ai(&self) -> bool {
        self.ai_score > self.real_score
    }

    /// Confidence is the winning side's score.
    pub fn confidence(&self) -> f64 {
        if self.is_ai() {
            self.ai_score
        } else {
            self.real_score
        }
    }
}

/// Frame statistics attached to video verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameStats {
    /// Frames extracted from the source video
    pub sampled: usize,
    /// Frames that produced a usable score
    pub analyzed: usize,
}

/// The result of one detection call.
///
/// This is the core's only externally visible output. A verdict is always
/// well-formed: when no usable signal could be obtained it carries the
/// neutral 0.5 scores and an `error` annotation instead of failing the call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    /// Whether the content is judged machine-generated.
    ///
    /// Serialized as `result`, the wire name consumers of the original
    /// service already depend on.
    #[serde(rename = "result")]
    pub is_ai_generated: bool,

    /// Confidence in the decision, in [0, 1]
    pub confidence: f64,

    /// Machine-generated score
    pub ai_score: f64,

    /// Human-produced score
    pub real_score: f64,

    /// Which candidate model answered, when one did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Annotation describing why the verdict fell back to neutral
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Frame statistics, present for video verdicts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<FrameStats>,
}

impl Verdict {
    /// Build a verdict from a normalized score and the model that produced it.
    pub fn from_score(score: NormalizedScore, model: impl Into<String>) -> Self {
        Self {
            is_ai_generated: score.is_ai(),
            confidence: score.confidence(),
            ai_score: score.ai_score,
            real_score: score.real_score,
            model: Some(model.into()),
            error: None,
            frames: None,
        }
    }

    /// The neutral fallback verdict with an error annotation.
    pub fn neutral(reason: impl Into<String>) -> Self {
        Self {
            is_ai_generated: false,
            confidence: 0.5,
            ai_score: 0.5,
            real_score: 0.5,
            model: None,
            error: Some(reason.into()),
            frames: None,
        }
    }

    /// Attach frame statistics.
    pub fn with_frames(mut self, frames: FrameStats) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Whether this verdict is the annotated neutral fallback.
    pub fn is_inconclusive(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_score() {
        let v = Verdict::from_score(NormalizedScore::new(0.3, 0.8), "detector-a");
        assert!(!v.is_ai_generated);
        assert!((v.confidence - 0.8).abs() < f64::EPSILON);
        assert_eq!(v.model.as_deref(), Some("detector-a"));
        assert!(!v.is_inconclusive());
    }

    #[test]
    fn test_neutral_verdict_contract() {
        let v = Verdict::neutral("all models failed");
        assert!(!v.is_ai_generated);
        assert_eq!(v.confidence, 0.5);
        assert_eq!(v.ai_score, 0.5);
        assert_eq!(v.real_score, 0.5);
        assert!(v.is_inconclusive());
    }

    #[test]
    fn test_verdict_wire_name() {
        let v = Verdict::from_score(NormalizedScore::new(0.9, 0.1), "m");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["result"], serde_json::json!(true));
        assert!(json.get("error").is_none());
        assert!(json.get("frames").is_none());
    }

    #[test]
    fn test_neutral_score_confidence() {
        let s = NormalizedScore::neutral();
        assert!(!s.is_ai());
        assert_eq!(s.confidence(), 0.5);
    }
}
