//! luma-mcp CLI entry point.

use anyhow::Result;
use clap::Parser;
use luma_mcp::builder::{ImageParams, VideoParams};
use luma_mcp::cli::{commands, Cli, Commands};
use luma_mcp::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli
        .config
        .as_deref()
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging; stdout is reserved for JSON-RPC in mcp mode
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("luma_mcp={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Image {
            prompt,
            aspect_ratio,
            model,
            image_ref,
            style_ref,
            character_ref,
            modify_ref,
        } => {
            let params = ImageParams {
                prompt,
                aspect_ratio,
                model,
                image_ref: Some(image_ref),
                style_ref,
                character_ref: Some(character_ref),
                modify_image_ref: modify_ref,
            };
            commands::run_image(params, settings).await?;
        }

        Commands::Video {
            prompt,
            aspect_ratio,
            model,
            looping,
            resolution,
            duration,
            frame0_image,
            frame1_image,
            frame0_id,
            frame1_id,
        } => {
            let params = VideoParams {
                prompt,
                aspect_ratio,
                model,
                looping: Some(looping),
                resolution,
                duration,
                frame0_image,
                frame1_image,
                frame0_id,
                frame1_id,
            };
            commands::run_video(params, settings).await?;
        }

        Commands::Status { id } => {
            commands::run_status(&id, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, &config_path)?;
        }
    }

    Ok(())
}
