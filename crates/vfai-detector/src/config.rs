//! Detector configuration.

use vfai_inference::{ConfigError, InferenceConfig};
use vfai_media::DEFAULT_FRAME_COUNT;

/// Top-level configuration for the detection pipeline.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Remote classification settings
    pub inference: InferenceConfig,
    /// Frames sampled per video
    pub frames_per_video: usize,
    /// Maximum frames analyzed concurrently
    pub frame_concurrency: usize,
    /// Text payloads are truncated to this many characters
    pub max_text_chars: usize,
    /// Frame-agreement ratio above which the confidence boost applies
    pub consistency_threshold: f64,
    /// Confidence multiplier applied on consistent videos, capped at 1.0
    pub consistency_boost: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new(InferenceConfig::default())
    }
}

impl DetectorConfig {
    /// Create a config with default pipeline tuning.
    ///
    /// The consistency threshold/boost and the low-signal threshold carried
    /// by the inference config are calibration knobs inherited from the
    /// source system, kept configurable rather than hard-coded.
    pub fn new(inference: InferenceConfig) -> Self {
        Self {
            inference,
            frames_per_video: DEFAULT_FRAME_COUNT,
            frame_concurrency: 4,
            max_text_chars: 5000,
            consistency_threshold: 0.6,
            consistency_boost: 1.1,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(InferenceConfig::from_env()?);

        config.frames_per_video = std::env::var("DETECTOR_FRAMES_PER_VIDEO")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FRAME_COUNT);
        config.frame_concurrency = std::env::var("DETECTOR_FRAME_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4);
        config.max_text_chars = std::env::var("DETECTOR_MAX_TEXT_CHARS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);
        config.consistency_threshold = std::env::var("DETECTOR_CONSISTENCY_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.6);
        config.consistency_boost = std::env::var("DETECTOR_CONSISTENCY_BOOST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.1);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning() {
        let config = DetectorConfig::default();
        assert_eq!(config.frames_per_video, 8);
        assert_eq!(config.max_text_chars, 5000);
        assert!((config.consistency_threshold - 0.6).abs() < 1e-9);
        assert!((config.consistency_boost - 1.1).abs() < 1e-9);
    }
}
