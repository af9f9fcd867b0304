//! Video command - generate a video from the command line.

use crate::builder::VideoParams;
use crate::cli::Output;
use crate::config::Settings;
use crate::generator::Generator;
use anyhow::Result;

/// Generate a video and print its URLs.
pub async fn run_video(params: VideoParams, settings: Settings) -> Result<()> {
    let generator = Generator::from_settings(&settings)?;

    let spinner = Output::spinner(&format!("Generating video: {}", params.prompt));
    let result = generator.create_video(&params).await;
    spinner.finish_and_clear();
    let output = result?;

    Output::success("Video ready");
    Output::kv("Generation ID", &output.generation_id);
    Output::kv("Video URL", &output.video_url);
    Output::kv("Thumbnail URL", &output.image_url);
    Output::kv("Thumbnail saved to", &output.thumbnail.path.display().to_string());

    Ok(())
}
