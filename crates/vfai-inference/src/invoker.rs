//! Single-endpoint classification calls.
//!
//! One invocation covers at most two HTTP requests against the same
//! candidate: the initial attempt and, when the endpoint reports it is
//! still loading the model, exactly one retry after the server-suggested
//! delay. Everything else is a typed failure the dispatcher converts into
//! "try the next candidate".

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use vfai_models::{ContentPayload, ModelCandidate, NormalizedScore, RawPrediction};

use crate::config::InferenceConfig;
use crate::error::{InvokeError, InvokeResult};
use crate::labels::normalize_predictions;

/// JSON body for text classification requests.
#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    inputs: &'a str,
}

/// Which request of the invocation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

/// What to do after a response arrives.
#[derive(Debug)]
enum Step {
    /// Success status; parse the body
    Parse,
    /// Model still loading; wait and send the single retry
    RetryAfter(Duration),
    /// Final failure for this candidate
    Fail(InvokeError),
}

/// Classify one payload against one candidate model.
///
/// Returns the normalized score pair on success. The HTTP client is
/// injected by the caller; this function holds no connection state of its
/// own. Dropping the returned future aborts any in-flight request.
pub async fn invoke(
    http: &Client,
    config: &InferenceConfig,
    candidate: &ModelCandidate,
    payload: &ContentPayload,
) -> InvokeResult<NormalizedScore> {
    let mut attempt = Attempt::First;

    loop {
        let response = send_request(http, config, candidate, payload).await?;
        let retry_after = retry_after(&response);

        match next_step(
            attempt,
            response.status(),
            retry_after,
            config.loading_retry_default,
        ) {
            Step::Parse => {
                let body: Value = response
                    .json()
                    .await
                    .map_err(|e| InvokeError::malformed(format!("invalid JSON body: {}", e)))?;
                let predictions = coerce_predictions(body)
                    .ok_or_else(|| InvokeError::malformed("no predictions in response"))?;
                debug!(
                    model = %candidate.id,
                    predictions = predictions.len(),
                    "Endpoint answered"
                );
                return Ok(normalize_predictions(
                    &predictions,
                    config.low_signal_threshold,
                ));
            }
            Step::RetryAfter(delay) => {
                info!(
                    model = %candidate.id,
                    delay_secs = delay.as_secs(),
                    "Model is loading, waiting before retry"
                );
                tokio::time::sleep(delay).await;
                attempt = Attempt::Retry;
            }
            Step::Fail(error) => return Err(error),
        }
    }
}

/// Send one classification request.
async fn send_request(
    http: &Client,
    config: &InferenceConfig,
    candidate: &ModelCandidate,
    payload: &ContentPayload,
) -> InvokeResult<Response> {
    let request = match payload {
        ContentPayload::Text(text) => http
            .post(&candidate.endpoint)
            .json(&TextRequest { inputs: text }),
        ContentPayload::Image(bytes) | ContentPayload::Video(bytes) => http
            .post(&candidate.endpoint)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes.clone()),
    };

    request
        .bearer_auth(&config.api_token)
        .timeout(config.timeout_for(payload.modality()))
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                InvokeError::Timeout
            } else {
                InvokeError::Unreachable(e.to_string())
            }
        })
}

/// The one-retry-then-fail transition table.
///
/// 503 means the hosted model is still being loaded onto a worker; the
/// first one earns a single delayed retry, the second is final. Any other
/// non-success status is final immediately.
fn next_step(
    attempt: Attempt,
    status: StatusCode,
    retry_after: Option<Duration>,
    default_wait: Duration,
) -> Step {
    if status.is_success() {
        return Step::Parse;
    }

    if status == StatusCode::SERVICE_UNAVAILABLE {
        return match attempt {
            Attempt::First => Step::RetryAfter(retry_after.unwrap_or(default_wait)),
            Attempt::Retry => Step::Fail(InvokeError::Unavailable),
        };
    }

    Step::Fail(InvokeError::malformed(format!(
        "unexpected status {}",
        status
    )))
}

/// Read a whole-seconds Retry-After header.
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Coerce an endpoint body into a prediction list.
///
/// Accepted shapes: a flat `{label, score}` object, a flat list of such
/// objects, or a list nested one level deep. Anything else, or an empty
/// list, is malformed.
fn coerce_predictions(body: Value) -> Option<Vec<RawPrediction>> {
    let flattened = match body {
        Value::Array(items) => match items.first() {
            Some(Value::Array(_)) => items.into_iter().next()?,
            _ => Value::Array(items),
        },
        Value::Object(_) => Value::Array(vec![body]),
        _ => return None,
    };

    let predictions: Vec<RawPrediction> = serde_json::from_value(flattened).ok()?;
    if predictions.is_empty() {
        None
    } else {
        Some(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> InferenceConfig {
        let mut config =
            InferenceConfig::new("test-token", format!("{}/models", server.uri()));
        config.loading_retry_default = Duration::from_millis(10);
        config
    }

    fn candidate(server: &MockServer, id: &str) -> ModelCandidate {
        ModelCandidate::new(&format!("{}/models", server.uri()), id)
    }

    #[test]
    fn test_transition_table() {
        let wait = Duration::from_secs(30);

        assert!(matches!(
            next_step(Attempt::First, StatusCode::OK, None, wait),
            Step::Parse
        ));
        assert!(matches!(
            next_step(Attempt::First, StatusCode::SERVICE_UNAVAILABLE, None, wait),
            Step::RetryAfter(d) if d == wait
        ));
        assert!(matches!(
            next_step(
                Attempt::First,
                StatusCode::SERVICE_UNAVAILABLE,
                Some(Duration::from_secs(7)),
                wait
            ),
            Step::RetryAfter(d) if d == Duration::from_secs(7)
        ));
        assert!(matches!(
            next_step(Attempt::Retry, StatusCode::SERVICE_UNAVAILABLE, None, wait),
            Step::Fail(InvokeError::Unavailable)
        ));
        assert!(matches!(
            next_step(Attempt::First, StatusCode::NOT_FOUND, None, wait),
            Step::Fail(InvokeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_coerce_flat_object() {
        let predictions =
            coerce_predictions(json!({"label": "FAKE", "score": 0.9})).unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].label, "FAKE");
    }

    #[test]
    fn test_coerce_flat_list() {
        let predictions = coerce_predictions(json!([
            {"label": "FAKE", "score": 0.9},
            {"label": "REAL", "score": 0.1}
        ]))
        .unwrap();
        assert_eq!(predictions.len(), 2);
    }

    #[test]
    fn test_coerce_nested_list() {
        let predictions = coerce_predictions(json!([[
            {"label": "REAL", "score": 0.7}
        ]]))
        .unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].label, "REAL");
    }

    #[test]
    fn test_coerce_rejects_empty_and_garbage() {
        assert!(coerce_predictions(json!([])).is_none());
        assert!(coerce_predictions(json!("ok")).is_none());
        assert!(coerce_predictions(json!({"message": "loading"})).is_none());
    }

    #[tokio::test]
    async fn test_invoke_text_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/detector"))
            .and(body_json(json!({"inputs": "written by a robot"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"label": "FAKE", "score": 0.9},
                {"label": "REAL", "score": 0.1}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(&server);
        let http = Client::new();
        let payload = ContentPayload::Text("written by a robot".to_string());

        let score = invoke(&http, &config, &candidate(&server, "detector"), &payload)
            .await
            .unwrap();
        assert!(score.is_ai());
        assert!((score.ai_score - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_invoke_retries_once_on_loading() {
        let server = MockServer::start().await;
        // First request: model loading with an immediate retry hint
        Mock::given(method("POST"))
            .and(path("/models/detector"))
            .respond_with(
                ResponseTemplate::new(503).insert_header("Retry-After", "0"),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        // Retry succeeds
        Mock::given(method("POST"))
            .and(path("/models/detector"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"label": "REAL", "score": 0.8}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(&server);
        let http = Client::new();
        let payload = ContentPayload::Image(vec![0xff, 0xd8]);

        let score = invoke(&http, &config, &candidate(&server, "detector"), &payload)
            .await
            .unwrap();
        assert!(!score.is_ai());
    }

    #[tokio::test]
    async fn test_invoke_gives_up_after_second_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/detector"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let config = test_config(&server);
        let http = Client::new();
        let payload = ContentPayload::Text("sample".to_string());

        let error = invoke(&http, &config, &candidate(&server, "detector"), &payload)
            .await
            .unwrap_err();
        assert!(matches!(error, InvokeError::Unavailable));
    }

    #[tokio::test]
    async fn test_invoke_rejects_empty_prediction_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/detector"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let config = test_config(&server);
        let http = Client::new();
        let payload = ContentPayload::Text("sample".to_string());

        let error = invoke(&http, &config, &candidate(&server, "detector"), &payload)
            .await
            .unwrap_err();
        assert!(matches!(error, InvokeError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_invoke_unreachable_endpoint() {
        // Nothing listens on this port
        let config = InferenceConfig::new("t", "http://127.0.0.1:1/models");
        let http = Client::new();
        let payload = ContentPayload::Text("sample".to_string());
        let candidate = ModelCandidate::new("http://127.0.0.1:1/models", "detector");

        let error = invoke(&http, &config, &candidate, &payload)
            .await
            .unwrap_err();
        assert!(matches!(error, InvokeError::Unreachable(_)));
    }
}
