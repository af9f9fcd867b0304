//! Local materialization of generated assets.

use crate::error::Result;
use crate::luma::DownloadedAsset;
use base64::Engine;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Longest file name produced from a URL.
const MAX_FILE_NAME_LEN: usize = 200;

const DEFAULT_MIME_TYPE: &str = "image/png";

/// A downloaded image, ready to be displayed inline or opened from disk.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pub path: PathBuf,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageHandle {
    /// Image bytes as standard base64, for MCP image content.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

/// Writes downloaded assets into a directory under URL-derived names.
///
/// The same URL always maps to the same file; a repeat download overwrites it.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an asset URL is stored at.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(sanitize_file_name(url))
    }

    /// Write a downloaded asset to disk and return its handle.
    #[instrument(skip(self, asset), fields(bytes = asset.bytes.len()))]
    pub async fn save(&self, url: &str, asset: DownloadedAsset) -> Result<ImageHandle> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(url);
        tokio::fs::write(&path, &asset.bytes).await?;
        debug!("Wrote asset to {}", path.display());

        Ok(ImageHandle {
            path,
            mime_type: image_mime_type(asset.content_type.as_deref()),
            data: asset.bytes,
        })
    }
}

/// Replace every non-alphanumeric character with `_`, keeping at most the
/// last [`MAX_FILE_NAME_LEN`] characters.
pub fn sanitize_file_name(url: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid regex"));

    let sanitized = re.replace_all(url, "_");
    let start = sanitized.len().saturating_sub(MAX_FILE_NAME_LEN);
    sanitized[start..].to_string()
}

/// Use the response content type when it names an image, else PNG.
fn image_mime_type(content_type: Option<&str>) -> String {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}
