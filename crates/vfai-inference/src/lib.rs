//! Remote classifier invocation for the Verifai detection core.
//!
//! This crate provides:
//! - Label normalization from raw endpoint predictions into the canonical
//!   (ai_score, real_score) pair
//! - A single-endpoint invoker with bearer auth, per-modality timeouts and
//!   the loading-retry state machine
//! - The fallback dispatcher that walks a modality's candidate list and
//!   always produces a verdict

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod invoker;
pub mod labels;

pub use config::InferenceConfig;
pub use dispatcher::dispatch;
pub use error::{ConfigError, InvokeError, InvokeResult};
pub use invoker::invoke;
pub use labels::normalize_predictions;
