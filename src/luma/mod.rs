//! Luma Dream Machine API access.
//!
//! The [`LumaApi`] trait is the seam between the generation flows and the
//! network; [`LumaClient`] is the reqwest-backed implementation.

mod client;
#[cfg(test)]
pub(crate) mod mock;
mod types;

pub use client::LumaClient;
pub use types::{
    AssetKind, Assets, CharacterIdentity, CharacterRef, Generation, GenerationStatus, ImageRef,
    ImageGenerationRequest, Keyframe, Keyframes, VideoGenerationRequest,
};

use crate::error::Result;
use async_trait::async_trait;

/// Bytes of a downloaded asset plus the reported content type.
#[derive(Debug, Clone)]
pub struct DownloadedAsset {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Operations the generation flows need from the provider.
#[async_trait]
pub trait LumaApi: Send + Sync {
    /// Submit an image generation job.
    async fn submit_image(&self, request: &ImageGenerationRequest) -> Result<Generation>;

    /// Submit a video generation job.
    async fn submit_video(&self, request: &VideoGenerationRequest) -> Result<Generation>;

    /// Fetch the current state of a generation.
    async fn get_generation(&self, id: &str) -> Result<Generation>;

    /// Download a finished asset from its CDN URL.
    async fn download(&self, url: &str) -> Result<DownloadedAsset>;
}
