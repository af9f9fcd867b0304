//! Configuration module for luma-mcp.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    ApiSettings, GeneralSettings, ImageSettings, PollingSettings, Settings, VideoSettings,
};
