//! Evenly spaced video frame sampling.
//!
//! Sampling never fails outright for bad input: a video that cannot be
//! probed or decoded yields an empty sample, which callers distinguish from
//! "sampled frames but detection failed". Only a missing ffmpeg/ffprobe
//! binary or scratch-space IO propagates as an error.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
use crate::container::ContainerFormat;
use crate::error::MediaResult;
use crate::probe::probe_video;

/// Default number of frames sampled per video.
pub const DEFAULT_FRAME_COUNT: usize = 8;

/// Longest side of a re-encoded frame, in pixels.
const MAX_FRAME_DIM: u32 = 1024;

/// JPEG quality for re-encoded frames.
const JPEG_QUALITY: u8 = 85;

/// Timeout for extracting a single frame.
const EXTRACT_TIMEOUT_SECS: u64 = 30;

/// One frame lifted out of a video, re-encoded as a standalone image.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// Frame index within the source video
    pub index: u64,
    /// JPEG-encoded image bytes
    pub jpeg: Vec<u8>,
}

/// Sample up to `target` evenly spaced frames from raw video bytes.
///
/// Each sampled frame is converted to RGB, downscaled so its longer side is
/// at most 1024 px, and re-encoded as an independent JPEG payload. Frames
/// that fail to extract or decode are skipped individually. All scratch
/// storage is released when the call returns, on every path.
pub async fn sample_frames(video: &[u8], target: usize) -> MediaResult<Vec<SampledFrame>> {
    if video.is_empty() || target == 0 {
        return Ok(Vec::new());
    }

    check_ffmpeg()?;
    check_ffprobe()?;

    let format = ContainerFormat::sniff(video);
    let scratch = tempfile::tempdir()?;
    let input = scratch.path().join(format!("input{}", format.suffix()));
    tokio::fs::write(&input, video).await?;

    let info = match probe_video(&input).await {
        Ok(info) => info,
        Err(e) => {
            warn!(error = %e, "Could not probe video, returning empty sample");
            return Ok(Vec::new());
        }
    };

    if info.total_frames == 0 {
        warn!("Video reports zero frames, returning empty sample");
        return Ok(Vec::new());
    }

    debug!(
        total_frames = info.total_frames,
        fps = info.fps,
        width = info.width,
        height = info.height,
        "Probed video for sampling"
    );

    let fps = if info.fps > 0.0 { info.fps } else { 30.0 };
    let positions = sample_positions(info.total_frames, target);
    let runner = FfmpegRunner::new().with_timeout(EXTRACT_TIMEOUT_SECS);

    let mut frames = Vec::with_capacity(positions.len());
    for &index in &positions {
        let raw = scratch.path().join(format!("frame_{}.png", index));
        let cmd = FfmpegCommand::new(&input, &raw)
            .seek(index as f64 / fps)
            .single_frame();

        if let Err(e) = runner.run(&cmd).await {
            warn!(frame = index, error = %e, "Failed to extract frame, skipping");
            continue;
        }

        match reencode_frame_file(&raw).await {
            Ok(jpeg) => frames.push(SampledFrame { index, jpeg }),
            Err(e) => {
                warn!(frame = index, error = %e, "Failed to re-encode frame, skipping");
            }
        }
    }

    info!(
        sampled = frames.len(),
        requested = positions.len(),
        "Frame sampling complete"
    );

    Ok(frames)
}

/// Choose `min(target, total_frames)` positions evenly spaced across
/// `[0, total_frames - 1]` inclusive.
///
/// Positions are linearly interpolated and rounded; rounding collisions
/// collapse, so fewer positions may be returned when frames are scarce.
fn sample_positions(total_frames: u64, target: usize) -> Vec<u64> {
    if total_frames == 0 || target == 0 {
        return Vec::new();
    }

    let n = target.min(total_frames as usize);
    if n == 1 {
        return vec![0];
    }

    let last = (total_frames - 1) as f64;
    let mut positions: Vec<u64> = (0..n)
        .map(|i| (last * i as f64 / (n - 1) as f64).round() as u64)
        .collect();
    positions.dedup();
    positions
}

/// Read an extracted frame from disk and re-encode it.
async fn reencode_frame_file(path: &Path) -> MediaResult<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    reencode_frame(&bytes)
}

/// Normalize a decoded frame to RGB, cap its longer side, and encode JPEG.
fn reencode_frame(raw: &[u8]) -> MediaResult<Vec<u8>> {
    let decoded = image::load_from_memory(raw)?;

    // to_rgb8 gives a canonical channel order whatever the source
    // (grayscale, rgba, 16-bit) decoded to
    let rgb = decoded.to_rgb8();
    let (w, h) = rgb.dimensions();

    let rgb = if w.max(h) > MAX_FRAME_DIM {
        DynamicImage::ImageRgb8(rgb)
            .resize(MAX_FRAME_DIM, MAX_FRAME_DIM, FilterType::Lanczos3)
            .to_rgb8()
    } else {
        rgb
    };

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode_image(&rgb)?;
    Ok(jpeg)
}
