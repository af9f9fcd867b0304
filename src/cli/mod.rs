//! CLI module for luma-mcp.

pub mod commands;
mod output;

pub use output::Output;

use crate::luma::ImageRef;
use clap::{Parser, Subcommand};

/// luma-mcp - Luma Dream Machine tools for AI assistants
///
/// Runs an MCP server exposing image and video generation, or calls the
/// same flows directly from the command line.
#[derive(Parser, Debug)]
#[command(name = "luma-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Generate an image and download it
    Image {
        /// Text description of the image
        prompt: String,

        /// Aspect ratio (1:1, 16:9, 9:16, 4:3, 3:4, 21:9, 9:21)
        #[arg(short, long)]
        aspect_ratio: Option<String>,

        /// Model (photon-1, photon-flash-1)
        #[arg(short, long)]
        model: Option<String>,

        /// Reference image as URL or URL@WEIGHT (repeatable)
        #[arg(long = "image-ref", value_parser = parse_image_ref)]
        image_ref: Vec<ImageRef>,

        /// Style reference as URL or URL@WEIGHT
        #[arg(long, value_parser = parse_image_ref)]
        style_ref: Option<ImageRef>,

        /// Character reference image URL (repeatable)
        #[arg(long = "character-ref")]
        character_ref: Vec<String>,

        /// Image to modify, as URL or URL@WEIGHT
        #[arg(long, value_parser = parse_image_ref)]
        modify_ref: Option<ImageRef>,
    },

    /// Generate a video and download its thumbnail
    Video {
        /// Text description of the video
        prompt: String,

        /// Aspect ratio (1:1, 16:9, 9:16, 4:3, 3:4, 21:9, 9:21)
        #[arg(short, long)]
        aspect_ratio: Option<String>,

        /// Model (ray-2, ray-flash-2, ray-1-6)
        #[arg(short, long)]
        model: Option<String>,

        /// Make the video loop seamlessly
        #[arg(long = "loop")]
        looping: bool,

        /// Resolution (540p, 720p, 1080p, 4k)
        #[arg(short, long)]
        resolution: Option<String>,

        /// Duration (5s, 9s)
        #[arg(short, long)]
        duration: Option<String>,

        /// URL of the first frame
        #[arg(long)]
        frame0_image: Option<String>,

        /// URL of the last frame
        #[arg(long)]
        frame1_image: Option<String>,

        /// Generation id to use as the first frame
        #[arg(long)]
        frame0_id: Option<String>,

        /// Generation id to use as the last frame
        #[arg(long)]
        frame1_id: Option<String>,
    },

    /// Show the current state of a generation
    Status {
        /// Generation id
        id: String,
    },

    /// Check API key, directories and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

/// Parse `URL` or `URL@WEIGHT` into an image reference.
///
/// The suffix only counts as a weight when it parses as a number, so URLs
/// containing `@` stay intact.
pub fn parse_image_ref(s: &str) -> std::result::Result<ImageRef, String> {
    if s.trim().is_empty() {
        return Err("reference URL is empty".to_string());
    }

    if let Some((url, weight)) = s.rsplit_once('@') {
        if let Ok(weight) = weight.parse::<f64>() {
            return Ok(ImageRef::new(url, weight));
        }
    }
    Ok(ImageRef::new(s, 1.0))
}
