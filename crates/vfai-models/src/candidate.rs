//! Candidate classifier models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One remote classifier eligible to answer requests for a modality.
///
/// Candidates are built once from configuration and never mutated at
/// runtime; the dispatcher walks them in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModelCandidate {
    /// Model identifier, e.g. `roberta-base-openai-detector`
    pub id: String,
    /// Fully resolved inference endpoint URL for this model
    pub endpoint: String,
}

impl ModelCandidate {
    /// Build a candidate from an endpoint base and a model id.
    ///
    /// The base is joined with a single `/`; a trailing slash on the base
    /// is tolerated.
    pub fn new(endpoint_base: &str, id: impl Into<String>) -> Self {
        let id = id.into();
        let endpoint = format!("{}/{}", endpoint_base.trim_end_matches('/'), id);
        Self { id, endpoint }
    }
}

impl fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
