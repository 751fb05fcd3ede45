//! Content modality.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of content being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Plain text
    Text,
    /// Still image
    Image,
    /// Video
    Video,
}

impl Modality {
    /// All supported modalities.
    pub const ALL: &'static [Modality] = &[Modality::Text, Modality::Image, Modality::Video];

    /// String form used in logs and error annotations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Image => "image",
            Modality::Video => "video",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown modality string.
#[derive(Debug, Error)]
#[error("unknown modality: {0}")]
pub struct ModalityParseError(pub String);

impl FromStr for Modality {
    type Err = ModalityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Modality::Text),
            "image" => Ok(Modality::Image),
            "video" => Ok(Modality::Video),
            other => Err(ModalityParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modality_roundtrip() {
        for m in Modality::ALL {
            assert_eq!(m.as_str().parse::<Modality>().unwrap(), *m);
        }
    }

    #[test]
    fn test_modality_parse_rejects_unknown() {
        assert!("audio".parse::<Modality>().is_err());
    }

    #[test]
    fn test_modality_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Modality::Image).unwrap(), "\"image\"");
    }
}
