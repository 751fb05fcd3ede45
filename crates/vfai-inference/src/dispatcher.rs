//! Candidate fallback dispatch.
//!
//! The dispatcher is the unit text and image detection use directly, and
//! the unit the video pipeline reuses once per sampled frame. It always
//! returns a verdict: individual candidate failures are logged and
//! swallowed, and total failure degrades to the annotated neutral verdict.

use reqwest::Client;
use tracing::{debug, error, info, warn};

use vfai_models::{ContentPayload, ModelCandidate, Verdict};

use crate::config::InferenceConfig;
use crate::invoker;

/// Classify one payload by walking the candidate list in declared order.
///
/// Stops at the first candidate that yields a usable score. An empty
/// payload short-circuits to the neutral verdict without contacting any
/// endpoint.
pub async fn dispatch(
    http: &Client,
    config: &InferenceConfig,
    candidates: &[ModelCandidate],
    payload: &ContentPayload,
) -> Verdict {
    let modality = payload.modality();

    if payload.is_empty() {
        debug!(%modality, "Empty payload, skipping endpoint dispatch");
        return Verdict::neutral(format!("{} payload cannot be empty", modality));
    }

    debug!(
        %modality,
        bytes = payload.len(),
        candidates = candidates.len(),
        "Dispatching payload"
    );

    for candidate in candidates {
        match invoker::invoke(http, config, candidate, payload).await {
            Ok(score) => {
                info!(
                    model = %candidate.id,
                    ai_score = score.ai_score,
                    real_score = score.real_score,
                    "Classification succeeded"
                );
                return Verdict::from_score(score, candidate.id.clone());
            }
            Err(e) => {
                warn!(model = %candidate.id, error = %e, "Candidate model failed, trying next");
            }
        }
    }

    error!(%modality, "All candidate models failed");
    Verdict::neutral(format!("all models failed to process the {}", modality))
}
