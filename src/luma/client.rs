//! reqwest-backed Luma API client.

use super::{DownloadedAsset, Generation, ImageGenerationRequest, LumaApi, VideoGenerationRequest};
use crate::config::ApiSettings;
use crate::error::{LumaError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, instrument};

const GENERATIONS_PATH: &str = "/dream-machine/v1/generations";

/// HTTP client for the Luma Dream Machine API.
///
/// One client is built per tool invocation and dropped when the invocation ends.
pub struct LumaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LumaClient {
    /// Build a client from settings, reading the API key from the environment.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        let api_key = settings.api_key()?;
        Self::with_config(
            &settings.base_url,
            api_key,
            Duration::from_secs(settings.request_timeout_secs),
            settings.accept_invalid_certs,
        )
    }

    /// Build a client with explicit configuration.
    pub fn with_config(
        base_url: &str,
        api_key: String,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn generations_url(&self) -> String {
        format!("{}{}", self.base_url, GENERATIONS_PATH)
    }

    /// URL of a single generation, with the id encoded as one path segment.
    fn generation_url(&self, id: &str) -> Result<url::Url> {
        let invalid = || LumaError::Config(format!("Invalid API base URL '{}'", self.base_url));
        let mut url = url::Url::parse(&self.generations_url()).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(id);
        Ok(url)
    }

    async fn submit<B>(&self, url: String, body: &B) -> Result<Generation>
    where
        B: serde::Serialize + Sync + ?Sized,
    {
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        let generation: Generation = check_status(response).await?.json().await?;

        match generation.id.as_deref() {
            Some(id) if !id.is_empty() => {
                debug!("Submitted generation {}", id);
                Ok(generation)
            }
            _ => Err(LumaError::MissingGenerationId),
        }
    }
}

/// Turn a non-2xx response into an API error carrying the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or(body);

    Err(LumaError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl LumaApi for LumaClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn submit_image(&self, request: &ImageGenerationRequest) -> Result<Generation> {
        self.submit(format!("{}/image", self.generations_url()), request)
            .await
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn submit_video(&self, request: &VideoGenerationRequest) -> Result<Generation> {
        self.submit(self.generations_url(), request).await
    }

    #[instrument(skip(self))]
    async fn get_generation(&self, id: &str) -> Result<Generation> {
        let response = self
            .http
            .get(self.generation_url(id)?)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    #[instrument(skip(self))]
    async fn download(&self, url: &str) -> Result<DownloadedAsset> {
        let parsed = url::Url::parse(url)
            .map_err(|e| LumaError::InvalidInput(format!("Invalid asset URL '{}': {}", url, e)))?;

        let response = check_status(self.http.get(parsed).send().await?).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().await?.to_vec();

        debug!("Downloaded {} bytes", bytes.len());
        Ok(DownloadedAsset {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luma::{AssetKind, GenerationStatus, Keyframes};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn client(base_url: &str) -> LumaClient {
        LumaClient::with_config(base_url, "k".to_string(), Duration::from_secs(5), false).unwrap()
    }

    fn image_request() -> ImageGenerationRequest {
        ImageGenerationRequest {
            prompt: "a red fox".to_string(),
            aspect_ratio: "1:1".to_string(),
            model: "photon-1".to_string(),
            image_ref: Vec::new(),
            style_ref: Vec::new(),
            character_ref: None,
            modify_image_ref: None,
        }
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    /// Serve one canned HTTP response and hand back the raw request it received.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];
            while !request_complete(&raw) {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (base_url, handle)
    }

    fn header_lines(request: &str) -> Vec<String> {
        request.lines().map(|line| line.to_lowercase()).collect()
    }

    #[test]
    fn test_client_creation() {
        let client = client("https://api.lumalabs.ai/");
        assert_eq!(
            client.generations_url(),
            "https://api.lumalabs.ai/dream-machine/v1/generations"
        );
    }

    #[test]
    fn test_generation_url_encodes_id() {
        let client = client("https://api.lumalabs.ai");
        let url = client.generation_url("a/../b?x").unwrap();
        assert_eq!(url.path(), "/dream-machine/v1/generations/a%2F..%2Fb%3Fx");
        assert_eq!(url.query(), None);
    }

    #[tokio::test]
    async fn test_download_rejects_invalid_url() {
        let err = client("https://api.lumalabs.ai")
            .download("not a url")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[tokio::test]
    async fn test_submit_image_posts_with_bearer_auth() {
        let (base_url, server) = serve_once(
            "201 Created",
            "application/json",
            r#"{"id":"abc","state":"queued"}"#,
        )
        .await;

        let generation = client(&base_url).submit_image(&image_request()).await.unwrap();
        assert_eq!(generation.id.as_deref(), Some("abc"));
        assert_eq!(generation.status, GenerationStatus::Queued);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /dream-machine/v1/generations/image HTTP/1.1\r\n"));
        assert!(header_lines(&request).contains(&"authorization: bearer k".to_string()));
        assert!(request.contains(r#""prompt":"a red fox""#));
        assert!(request.contains(r#""model":"photon-1""#));
    }

    #[tokio::test]
    async fn test_submit_video_posts_to_generations() {
        let (base_url, server) =
            serve_once("201 Created", "application/json", r#"{"id":"vid1","state":"queued"}"#)
                .await;

        let request = VideoGenerationRequest {
            prompt: "waves".to_string(),
            aspect_ratio: "16:9".to_string(),
            model: "ray-2".to_string(),
            looping: true,
            resolution: "720p".to_string(),
            duration: "5s".to_string(),
            keyframes: Keyframes::default(),
        };
        let generation = client(&base_url).submit_video(&request).await.unwrap();
        assert_eq!(generation.id.as_deref(), Some("vid1"));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /dream-machine/v1/generations HTTP/1.1\r\n"));
        assert!(raw.contains(r#""loop":true"#));
        assert!(!raw.contains("keyframes"));
    }

    #[tokio::test]
    async fn test_submit_without_id_is_missing_generation_id() {
        let (base_url, server) =
            serve_once("200 OK", "application/json", r#"{"state":"queued"}"#).await;

        let err = client(&base_url).submit_image(&image_request()).await.unwrap_err();
        assert!(matches!(err, LumaError::MissingGenerationId));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_generation() {
        let (base_url, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"id":"abc","state":"completed","assets":{"image":"https://cdn/x.png"}}"#,
        )
        .await;

        let generation = client(&base_url).get_generation("abc").await.unwrap();
        assert!(generation.status.is_completed());
        assert_eq!(generation.assets.get(AssetKind::Image), Some("https://cdn/x.png"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /dream-machine/v1/generations/abc HTTP/1.1\r\n"));
        assert!(header_lines(&request).contains(&"authorization: bearer k".to_string()));
    }

    #[tokio::test]
    async fn test_error_status_uses_detail() {
        let (base_url, server) = serve_once(
            "400 Bad Request",
            "application/json",
            r#"{"detail":"bad prompt"}"#,
        )
        .await;

        let err = client(&base_url).submit_image(&image_request()).await.unwrap_err();
        match &err {
            LumaError::Api { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "bad prompt");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.kind(), "api");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_without_detail_keeps_body() {
        let (base_url, server) =
            serve_once("503 Service Unavailable", "text/plain", "upstream down").await;

        let err = client(&base_url).get_generation("abc").await.unwrap_err();
        match err {
            LumaError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_download_sends_no_auth() {
        let (base_url, server) = serve_once("200 OK", "image/png", "PNGDATA").await;

        let asset = client("https://api.lumalabs.ai")
            .download(&format!("{}/files/x.png", base_url))
            .await
            .unwrap();
        assert_eq!(asset.bytes, b"PNGDATA".to_vec());
        assert_eq!(asset.content_type.as_deref(), Some("image/png"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /files/x.png HTTP/1.1\r\n"));
        assert!(!request.to_lowercase().contains("authorization"));
    }
}
