//! Error types for luma-mcp.

use crate::luma::AssetKind;
use thiserror::Error;

/// Library-level error type for generation operations.
#[derive(Error, Debug)]
pub enum LumaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Luma API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("No id found in generation")]
    MissingGenerationId,

    #[error("Generation {id} failed: {reason}")]
    GenerationFailed { id: String, reason: String },

    #[error("Generation {id} completed without a {kind} asset")]
    MissingAsset { id: String, kind: AssetKind },

    #[error("Generation {id} still pending after {attempts} polls ({elapsed_secs:.1}s)")]
    PollTimeout {
        id: String,
        attempts: u32,
        elapsed_secs: f64,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LumaError {
    /// Stable machine-readable name for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            LumaError::Config(_) => "config",
            LumaError::Api { .. } => "api",
            LumaError::MissingGenerationId => "missing_generation_id",
            LumaError::GenerationFailed { .. } => "generation_failed",
            LumaError::MissingAsset { .. } => "missing_asset",
            LumaError::PollTimeout { .. } => "poll_timeout",
            LumaError::InvalidInput(_) => "invalid_input",
            LumaError::Io(_) => "io",
            LumaError::Json(_) => "json",
            LumaError::TomlParse(_) => "toml",
            LumaError::Http(_) => "http",
        }
    }
}

/// Result type alias for luma-mcp operations.
pub type Result<T> = std::result::Result<T, LumaError>;
