//! luma-mcp - Luma Dream Machine tools for AI assistants
//!
//! Exposes image and video generation as MCP tools, backed by the Luma
//! Dream Machine API.
//!
//! # Overview
//!
//! A tool call goes through three steps:
//! - the flat tool arguments are turned into a Luma request body
//! - the submitted generation is polled until its assets exist or it fails
//! - the resulting image (or video thumbnail) is downloaded to a temp file
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `luma` - Provider wire types and HTTP client
//! - `builder` - Tool parameters to request bodies
//! - `poller` - Bounded completion polling
//! - `media` - Downloaded asset storage
//! - `generator` - Submit/poll/download flows
//! - `mcp` - JSON-RPC server over stdio
//!
//! # Example
//!
//! ```rust,no_run
//! use luma_mcp::builder::ImageParams;
//! use luma_mcp::config::Settings;
//! use luma_mcp::generator::Generator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let generator = Generator::from_settings(&settings)?;
//!
//!     let params = ImageParams {
//!         prompt: "a red fox in snow".to_string(),
//!         aspect_ratio: Some("1:1".to_string()),
//!         ..ImageParams::default()
//!     };
//!     let output = generator.create_image(&params).await?;
//!     println!("{} -> {}", output.image_url, output.image.path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod luma;
pub mod mcp;
pub mod media;
pub mod poller;

pub use error::{LumaError, Result};
