//! Inference configuration.

use std::time::Duration;

use vfai_models::{Modality, ModelCandidate};

use crate::error::ConfigError;

/// Default inference endpoint base.
pub const DEFAULT_ENDPOINT_BASE: &str = "https://api-inference.huggingface.co/models";

/// Default candidate models for text classification, in fallback order.
pub const DEFAULT_TEXT_MODELS: &[&str] = &[
    "roberta-base-openai-detector",
    "distilroberta-base-openai-detector",
    "Hello-SimpleAI/chatgpt-detector-roberta",
];

/// Default candidate models for image classification, in fallback order.
pub const DEFAULT_IMAGE_MODELS: &[&str] =
    &["orvit/gan-image-detection", "umm-maybe/AI-image-detector"];

/// Configuration for remote classification.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Bearer token for the inference API
    pub api_token: String,
    /// Endpoint base joined with each model id
    pub endpoint_base: String,
    /// Ordered text candidates
    pub text_models: Vec<ModelCandidate>,
    /// Ordered image candidates (also used per video frame)
    pub image_models: Vec<ModelCandidate>,
    /// Request timeout for text payloads
    pub text_timeout: Duration,
    /// Request timeout for image payloads
    pub image_timeout: Duration,
    /// Wait before the single loading retry when no Retry-After is given
    pub loading_retry_default: Duration,
    /// Below this summed score the normalizer reports the neutral pair
    pub low_signal_threshold: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self::new("", DEFAULT_ENDPOINT_BASE)
    }
}

impl InferenceConfig {
    /// Create a config with the default candidate lists and timeouts.
    pub fn new(api_token: impl Into<String>, endpoint_base: impl Into<String>) -> Self {
        let endpoint_base = endpoint_base.into();
        Self {
            api_token: api_token.into(),
            text_models: candidates(&endpoint_base, DEFAULT_TEXT_MODELS.iter().copied()),
            image_models: candidates(&endpoint_base, DEFAULT_IMAGE_MODELS.iter().copied()),
            endpoint_base,
            text_timeout: Duration::from_secs(60),
            image_timeout: Duration::from_secs(90),
            loading_retry_default: Duration::from_secs(30),
            low_signal_threshold: 0.1,
        }
    }

    /// Create config from environment variables.
    ///
    /// A missing API key is fatal; everything else has documented defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token =
            std::env::var("HUGGINGFACE_API_KEY").map_err(|_| ConfigError::MissingApiToken)?;

        let endpoint_base = std::env::var("DETECTOR_ENDPOINT_BASE")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT_BASE.to_string());

        let mut config = Self::new(api_token, endpoint_base);

        if let Ok(models) = std::env::var("DETECTOR_TEXT_MODELS") {
            config.text_models = candidates(&config.endpoint_base, split_models(&models));
        }
        if let Ok(models) = std::env::var("DETECTOR_IMAGE_MODELS") {
            config.image_models = candidates(&config.endpoint_base, split_models(&models));
        }

        config.text_timeout = Duration::from_secs(
            std::env::var("DETECTOR_TEXT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        );
        config.image_timeout = Duration::from_secs(
            std::env::var("DETECTOR_IMAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(90),
        );
        config.loading_retry_default = Duration::from_secs(
            std::env::var("DETECTOR_LOADING_RETRY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        );
        config.low_signal_threshold = std::env::var("DETECTOR_LOW_SIGNAL_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(config)
    }

    /// Candidate list for a modality.
    ///
    /// Video has no list of its own: the video pipeline dispatches each
    /// sampled frame against the image candidates.
    pub fn models_for(&self, modality: Modality) -> &[ModelCandidate] {
        match modality {
            Modality::Text => &self.text_models,
            Modality::Image | Modality::Video => &self.image_models,
        }
    }

    /// Request timeout for a modality.
    pub fn timeout_for(&self, modality: Modality) -> Duration {
        match modality {
            Modality::Text => self.text_timeout,
            Modality::Image | Modality::Video => self.image_timeout,
        }
    }
}

fn candidates<'a>(
    endpoint_base: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Vec<ModelCandidate> {
    ids.into_iter()
        .map(|id| ModelCandidate::new(endpoint_base, id))
        .collect()
}

fn split_models(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidate_lists() {
        let config = InferenceConfig::default();
        assert_eq!(config.text_models.len(), DEFAULT_TEXT_MODELS.len());
        assert_eq!(
            config.text_models[0].endpoint,
            format!("{}/{}", DEFAULT_ENDPOINT_BASE, DEFAULT_TEXT_MODELS[0])
        );
        assert!(!config.image_models.is_empty());
    }

    #[test]
    fn test_timeout_per_modality() {
        let config = InferenceConfig::default();
        assert_eq!(config.timeout_for(Modality::Text), Duration::from_secs(60));
        assert_eq!(config.timeout_for(Modality::Image), Duration::from_secs(90));
    }

    #[test]
    fn test_split_models_trims_and_skips_empty() {
        let ids: Vec<&str> = split_models(" a , b ,, c ").collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
