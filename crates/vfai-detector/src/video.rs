//! Video detection: frame sampling plus temporal aggregation.
//!
//! Each sampled frame runs through the image fallback dispatcher
//! independently; frame order never influences a frame's candidate walk.
//! Aggregation is an order-independent mean, so frames are analyzed
//! concurrently under a bounded semaphore and reassembled by index first.

use std::sync::Arc;

use futures::future::join_all;
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use vfai_inference::dispatch;
use vfai_media::sample_frames;
use vfai_models::{ContentPayload, FrameStats, NormalizedScore, Verdict};

use crate::config::DetectorConfig;

/// Classify a video by sampling frames and aggregating per-frame verdicts.
pub(crate) async fn detect_video(http: &Client, config: &DetectorConfig, video: &[u8]) -> Verdict {
    let frames = match sample_frames(video, config.frames_per_video).await {
        Ok(frames) => frames,
        Err(e) => {
            warn!(error = %e, "Frame sampling failed");
            Vec::new()
        }
    };

    if frames.is_empty() {
        return Verdict::neutral("failed to extract frames from video");
    }

    let sampled = frames.len();
    info!(sampled, "Analyzing sampled frames");

    let semaphore = Arc::new(Semaphore::new(config.frame_concurrency.max(1)));
    let frame_futures: Vec<_> = frames
        .into_iter()
        .map(|frame| {
            let semaphore = semaphore.clone();
            async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                let payload = ContentPayload::Image(frame.jpeg);
                let verdict = dispatch(
                    http,
                    &config.inference,
                    &config.inference.image_models,
                    &payload,
                )
                .await;
                (frame.index, verdict)
            }
        })
        .collect();

    let mut results = join_all(frame_futures).await;
    results.sort_by_key(|(index, _)| *index);

    // Frames whose dispatch fell back to the annotated neutral verdict are
    // excluded from aggregation rather than counted as evidence
    let analyzed: Vec<Verdict> = results
        .into_iter()
        .map(|(_, verdict)| verdict)
        .filter(|verdict| !verdict.is_inconclusive())
        .collect();

    if analyzed.is_empty() {
        return Verdict::neutral("failed to analyze video frames").with_frames(FrameStats {
            sampled,
            analyzed: 0,
        });
    }

    let verdict = aggregate_frames(
        &analyzed,
        config.consistency_threshold,
        config.consistency_boost,
    );

    info!(
        sampled,
        analyzed = analyzed.len(),
        ai_score = verdict.ai_score,
        real_score = verdict.real_score,
        confidence = verdict.confidence,
        "Video analysis complete"
    );

    verdict.with_frames(FrameStats {
        sampled,
        analyzed: analyzed.len(),
    })
}

/// Combine per-frame verdicts into one video-level verdict.
///
/// Scores are averaged and renormalized to a probability pair; when frames
/// largely agree on the same binary decision, confidence gets the
/// consistency boost, capped at 1.0.
fn aggregate_frames(
    frames: &[Verdict],
    consistency_threshold: f64,
    consistency_boost: f64,
) -> Verdict {
    let count = frames.len() as f64;
    let mut avg_ai = frames.iter().map(|f| f.ai_score).sum::<f64>() / count;
    let mut avg_real = frames.iter().map(|f| f.real_score).sum::<f64>() / count;

    let total = avg_ai + avg_real;
    if total > 0.0 {
        avg_ai /= total;
        avg_real /= total;
    }

    let score = NormalizedScore::new(avg_ai, avg_real);
    let mut confidence = score.confidence();

    let ai_frames = frames.iter().filter(|f| f.is_ai_generated).count();
    let real_frames = frames.len() - ai_frames;
    let consistency = (ai_frames as f64 - real_frames as f64).abs() / count;

    if consistency > consistency_threshold {
        confidence = (confidence * consistency_boost).min(1.0);
        debug!(consistency, confidence, "Applied consistency boost");
    }

    Verdict {
        is_ai_generated: score.is_ai(),
        confidence,
        ai_score: avg_ai,
        real_score: avg_real,
        model: None,
        error: None,
        frames: None,
    }
}
