//! Classify a file or text snippet from the command line.
//!
//! Usage:
//!   classify_file text "some suspicious prose"
//!   classify_file image ./photo.jpg
//!   classify_file video ./clip.mp4
//!
//! Requires HUGGINGFACE_API_KEY in the environment or a .env file.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vfai_detector::{ContentPayload, Detector, Modality};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let modality: Modality = args
        .next()
        .context("usage: classify_file <text|image|video> <path-or-text>")?
        .parse()?;
    let input = args.next().context("missing path or text argument")?;

    let payload = match modality {
        Modality::Text => ContentPayload::Text(input),
        Modality::Image => {
            ContentPayload::Image(std::fs::read(&input).context("reading image file")?)
        }
        Modality::Video => {
            ContentPayload::Video(std::fs::read(&input).context("reading video file")?)
        }
    };

    let detector = Detector::from_env()?;
    let verdict = detector.classify(&payload).await;

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
