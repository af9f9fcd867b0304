//! Status command - inspect a generation without waiting for it.

use crate::cli::Output;
use crate::config::Settings;
use crate::generator::Generator;
use anyhow::Result;

/// Print the current status and assets of a generation.
pub async fn run_status(id: &str, settings: Settings) -> Result<()> {
    let generator = Generator::from_settings(&settings)?;
    let generation = generator.status(id).await?;

    Output::header(&format!("Generation {}", id));
    Output::kv("Status", &generation.status.to_string());
    if let Some(reason) = &generation.failure_reason {
        Output::kv("Failure reason", reason);
    }
    Output::kv("Image", generation.assets.image.as_deref().unwrap_or("-"));
    Output::kv("Video", generation.assets.video.as_deref().unwrap_or("-"));

    Ok(())
}
