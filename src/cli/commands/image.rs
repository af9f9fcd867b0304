//! Image command - generate an image from the command line.

use crate::builder::ImageParams;
use crate::cli::Output;
use crate::config::Settings;
use crate::generator::Generator;
use anyhow::Result;

/// Generate an image and print where it was saved.
pub async fn run_image(params: ImageParams, settings: Settings) -> Result<()> {
    let generator = Generator::from_settings(&settings)?;

    let spinner = Output::spinner(&format!("Generating image: {}", params.prompt));
    let result = generator.create_image(&params).await;
    spinner.finish_and_clear();
    let output = result?;

    Output::success("Image ready");
    Output::kv("Generation ID", &output.generation_id);
    Output::kv("Image URL", &output.image_url);
    Output::kv("Saved to", &output.image.path.display().to_string());

    Ok(())
}
