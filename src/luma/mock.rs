//! Scripted in-memory stand-in for the Luma API, used by unit tests.

use super::{
    DownloadedAsset, Generation, GenerationStatus, ImageGenerationRequest, LumaApi,
    VideoGenerationRequest,
};
use crate::error::{LumaError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays a fixed sequence of status responses for a single generation.
///
/// Once the script runs out, the last response repeats.
pub struct ScriptedApi {
    submit_id: Option<String>,
    statuses: Mutex<VecDeque<Generation>>,
    last: Mutex<Option<Generation>>,
    pub polls: Mutex<u32>,
    pub image_requests: Mutex<Vec<ImageGenerationRequest>>,
    pub video_requests: Mutex<Vec<VideoGenerationRequest>>,
    pub downloads: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new(submit_id: Option<&str>, statuses: Vec<Generation>) -> Self {
        Self {
            submit_id: submit_id.map(|s| s.to_string()),
            statuses: Mutex::new(statuses.into()),
            last: Mutex::new(None),
            polls: Mutex::new(0),
            image_requests: Mutex::new(Vec::new()),
            video_requests: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn poll_count(&self) -> u32 {
        *self.polls.lock().unwrap()
    }

    fn submitted(&self) -> Result<Generation> {
        match &self.submit_id {
            Some(id) => Ok(generation(id, "queued", None, None)),
            None => Err(LumaError::MissingGenerationId),
        }
    }
}

/// Build a generation response with the given status and assets.
pub fn generation(id: &str, status: &str, image: Option<&str>, video: Option<&str>) -> Generation {
    let mut generation = Generation {
        id: Some(id.to_string()),
        status: GenerationStatus::from(Some(status.to_string())),
        ..Generation::default()
    };
    generation.assets.image = image.map(|s| s.to_string());
    generation.assets.video = video.map(|s| s.to_string());
    if generation.status.is_failed() {
        generation.failure_reason = Some("content moderation".to_string());
    }
    generation
}

#[async_trait]
impl LumaApi for ScriptedApi {
    async fn submit_image(&self, request: &ImageGenerationRequest) -> Result<Generation> {
        self.image_requests.lock().unwrap().push(request.clone());
        self.submitted()
    }

    async fn submit_video(&self, request: &VideoGenerationRequest) -> Result<Generation> {
        self.video_requests.lock().unwrap().push(request.clone());
        self.submitted()
    }

    async fn get_generation(&self, _id: &str) -> Result<Generation> {
        *self.polls.lock().unwrap() += 1;

        let next = self.statuses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(generation) = next {
            *last = Some(generation);
        }
        last.clone()
            .ok_or_else(|| LumaError::InvalidInput("no scripted status".to_string()))
    }

    async fn download(&self, url: &str) -> Result<DownloadedAsset> {
        self.downloads.lock().unwrap().push(url.to_string());
        Ok(DownloadedAsset {
            bytes: b"\x89PNG fake".to_vec(),
            content_type: Some("image/png".to_string()),
        })
    }
}
