//! Shared data models for the Verifai detection core.
//!
//! This crate provides Serde-serializable types for:
//! - Content payloads and their modality
//! - Candidate classifier models
//! - Raw endpoint predictions and normalized score pairs
//! - The verdict returned to callers

pub mod candidate;
pub mod modality;
pub mod payload;
pub mod prediction;
pub mod verdict;

// Re-export common types
pub use candidate::ModelCandidate;
pub use modality::{Modality, ModalityParseError};
pub use payload::ContentPayload;
pub use prediction::RawPrediction;
pub use verdict::{FrameStats, NormalizedScore, Verdict};
