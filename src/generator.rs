//! Submit, poll and materialize flows for images and videos.

use crate::builder::{build_image_request, build_video_request, ImageParams, VideoParams};
use crate::config::{ImageSettings, Settings, VideoSettings};
use crate::error::{LumaError, Result};
use crate::luma::{AssetKind, Generation, LumaApi, LumaClient};
use crate::media::{AssetStore, ImageHandle};
use crate::poller::{PollPolicy, Poller};
use tracing::{info, instrument};

/// Result of a finished image generation.
#[derive(Debug, Clone)]
pub struct ImageOutput {
    pub image: ImageHandle,
    pub image_url: String,
    pub generation_id: String,
}

/// Result of a finished video generation.
#[derive(Debug, Clone)]
pub struct VideoOutput {
    pub thumbnail: ImageHandle,
    pub video_url: String,
    pub image_url: String,
    pub generation_id: String,
}

/// Runs generation jobs against a provider.
pub struct Generator<A: LumaApi> {
    api: A,
    policy: PollPolicy,
    store: AssetStore,
    image_defaults: ImageSettings,
    video_defaults: VideoSettings,
}

impl Generator<LumaClient> {
    /// Build a generator with a fresh HTTP client from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = LumaClient::from_settings(&settings.api)?;
        Ok(Self::new(client, settings))
    }
}

impl<A: LumaApi> Generator<A> {
    pub fn new(api: A, settings: &Settings) -> Self {
        Self {
            api,
            policy: settings.polling.policy(),
            store: AssetStore::new(settings.temp_dir()),
            image_defaults: settings.image.clone(),
            video_defaults: settings.video.clone(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Generate an image and download it locally.
    #[instrument(skip(self, params))]
    pub async fn create_image(&self, params: &ImageParams) -> Result<ImageOutput> {
        let request = build_image_request(params, &self.image_defaults);
        let generation = self.api.submit_image(&request).await?;
        let id = generation_id(&generation)?;
        info!("Image generation {} submitted", id);

        let done = Poller::new(&self.api, self.policy.clone())
            .wait_for(&id, &[AssetKind::Image])
            .await?;
        let image_url = done.url(AssetKind::Image)?.to_string();
        let image = self.materialize(&image_url).await?;

        Ok(ImageOutput {
            image,
            image_url,
            generation_id: id,
        })
    }

    /// Generate a video and download its thumbnail locally.
    #[instrument(skip(self, params))]
    pub async fn create_video(&self, params: &VideoParams) -> Result<VideoOutput> {
        let request = build_video_request(params, &self.video_defaults);
        let generation = self.api.submit_video(&request).await?;
        let id = generation_id(&generation)?;
        info!("Video generation {} submitted", id);

        let done = Poller::new(&self.api, self.policy.clone())
            .wait_for(&id, &[AssetKind::Video, AssetKind::Image])
            .await?;
        let video_url = done.url(AssetKind::Video)?.to_string();
        let image_url = done.url(AssetKind::Image)?.to_string();
        let thumbnail = self.materialize(&image_url).await?;

        Ok(VideoOutput {
            thumbnail,
            video_url,
            image_url,
            generation_id: id,
        })
    }

    /// Fetch the current state of a generation without waiting.
    pub async fn status(&self, id: &str) -> Result<Generation> {
        self.api.get_generation(id).await
    }

    async fn materialize(&self, url: &str) -> Result<ImageHandle> {
        let asset = self.api.download(url).await?;
        self.store.save(url, asset).await
    }
}

fn generation_id(generation: &Generation) -> Result<String> {
    generation
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(LumaError::MissingGenerationId)
}
