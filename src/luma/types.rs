//! Wire types for the Luma Dream Machine API.

use serde::{Deserialize, Deserializer, Serialize};

fn default_weight() -> f64 {
    1.0
}

/// An input image that conditions generation, with an influence weight in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl ImageRef {
    pub fn new(url: impl Into<String>, weight: f64) -> Self {
        Self {
            url: url.into(),
            weight,
        }
    }
}

/// Character reference: a set of images of the same identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterRef {
    pub identity0: CharacterIdentity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterIdentity {
    pub images: Vec<String>,
}

/// Body for `POST /dream-machine/v1/generations/image`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub aspect_ratio: String,
    pub model: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_ref: Vec<ImageRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub style_ref: Vec<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_ref: Option<CharacterRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modify_image_ref: Option<ImageRef>,
}

/// Start or end anchor frame of a video.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Keyframe {
    Image { url: String },
    Generation { id: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Keyframes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame0: Option<Keyframe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame1: Option<Keyframe>,
}

impl Keyframes {
    pub fn is_empty(&self) -> bool {
        self.frame0.is_none() && self.frame1.is_none()
    }
}

/// Body for `POST /dream-machine/v1/generations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoGenerationRequest {
    pub prompt: String,
    pub aspect_ratio: String,
    pub model: String,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub resolution: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Keyframes::is_empty")]
    pub keyframes: Keyframes,
}

/// Status of a generation job as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum GenerationStatus {
    #[default]
    Unknown,
    Queued,
    Dreaming,
    Completed,
    Failed,
    Other(String),
}

impl From<Option<String>> for GenerationStatus {
    fn from(s: Option<String>) -> Self {
        let Some(s) = s else {
            return GenerationStatus::Unknown;
        };
        match s.to_lowercase().as_str() {
            "queued" | "pending" => GenerationStatus::Queued,
            "dreaming" | "processing" => GenerationStatus::Dreaming,
            "completed" => GenerationStatus::Completed,
            "failed" => GenerationStatus::Failed,
            "" => GenerationStatus::Unknown,
            _ => GenerationStatus::Other(s),
        }
    }
}

impl GenerationStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, GenerationStatus::Failed)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, GenerationStatus::Completed)
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStatus::Unknown => write!(f, "unknown"),
            GenerationStatus::Queued => write!(f, "queued"),
            GenerationStatus::Dreaming => write!(f, "dreaming"),
            GenerationStatus::Completed => write!(f, "completed"),
            GenerationStatus::Failed => write!(f, "failed"),
            GenerationStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Kind of output asset a generation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Video => write!(f, "video"),
        }
    }
}

/// Output URLs of a generation, keyed by kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Assets {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

impl Assets {
    pub fn get(&self, kind: AssetKind) -> Option<&str> {
        match kind {
            AssetKind::Image => self.image.as_deref(),
            AssetKind::Video => self.video.as_deref(),
        }
        .filter(|url| !url.is_empty())
    }
}

/// Accepts any JSON for `assets`; anything but an object reads as no assets.
fn lenient_assets<'de, D>(deserializer: D) -> std::result::Result<Assets, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_object() {
        Ok(serde_json::from_value(value).unwrap_or_default())
    } else {
        Ok(Assets::default())
    }
}

/// A generation job as returned by submit and status endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Generation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "state")]
    pub status: GenerationStatus,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_assets")]
    pub assets: Assets,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parsing() {
        let generation: Generation = serde_json::from_value(json!({
            "id": "abc",
            "status": "Completed",
            "assets": {"image": "https://cdn/x.png"}
        }))
        .unwrap();
        assert!(generation.status.is_completed());
        assert_eq!(generation.assets.get(AssetKind::Image), Some("https://cdn/x.png"));
        assert_eq!(generation.assets.get(AssetKind::Video), None);
    }

    #[test]
    fn test_state_alias_and_failure_reason() {
        let generation: Generation = serde_json::from_value(json!({
            "id": "abc",
            "state": "failed",
            "failure_reason": "prompt rejected"
        }))
        .unwrap();
        assert!(generation.status.is_failed());
        assert_eq!(generation.failure_reason.as_deref(), Some("prompt rejected"));
    }

    #[test]
    fn test_non_object_assets_are_empty() {
        let generation: Generation = serde_json::from_value(json!({
            "id": "abc",
            "status": "dreaming",
            "assets": null
        }))
        .unwrap();
        assert_eq!(generation.assets, Assets::default());

        let generation: Generation = serde_json::from_value(json!({
            "status": "queued",
            "assets": ["not", "a", "map"]
        }))
        .unwrap();
        assert_eq!(generation.status, GenerationStatus::Queued);
        assert_eq!(generation.assets, Assets::default());
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let generation: Generation =
            serde_json::from_value(json!({"status": "upscaling"})).unwrap();
        assert_eq!(generation.status, GenerationStatus::Other("upscaling".to_string()));
        assert_eq!(generation.status.to_string(), "upscaling");

        let generation: Generation = serde_json::from_value(json!({"status": null})).unwrap();
        assert_eq!(generation.status, GenerationStatus::Unknown);
    }

    #[test]
    fn test_keyframe_serialization() {
        let keyframes = Keyframes {
            frame0: Some(Keyframe::Image {
                url: "https://a/0.png".to_string(),
            }),
            frame1: Some(Keyframe::Generation {
                id: "abc".to_string(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&keyframes).unwrap(),
            json!({
                "frame0": {"type": "image", "url": "https://a/0.png"},
                "frame1": {"type": "generation", "id": "abc"}
            })
        );
    }

    #[test]
    fn test_image_ref_default_weight() {
        let image_ref: ImageRef = serde_json::from_value(json!({"url": "https://a"})).unwrap();
        assert_eq!(image_ref.weight, 1.0);
    }
}
