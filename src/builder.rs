//! Translation of flat tool parameters into Luma request bodies.
//!
//! Optional structures (references, keyframes) are only emitted when the
//! caller supplied them. Values are passed through unvalidated; the provider
//! rejects what it does not accept.

use crate::config::{ImageSettings, VideoSettings};
use crate::luma::{
    CharacterIdentity, CharacterRef, ImageGenerationRequest, ImageRef, Keyframe, Keyframes,
    VideoGenerationRequest,
};
use serde::Deserialize;

/// Arguments of the `create_image` tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageParams {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub image_ref: Option<Vec<ImageRef>>,
    #[serde(default)]
    pub style_ref: Option<ImageRef>,
    #[serde(default)]
    pub character_ref: Option<Vec<String>>,
    #[serde(default)]
    pub modify_image_ref: Option<ImageRef>,
}

/// Arguments of the `create_video` tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoParams {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "loop")]
    pub looping: Option<bool>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub frame0_image: Option<String>,
    #[serde(default)]
    pub frame1_image: Option<String>,
    #[serde(default)]
    pub frame0_id: Option<String>,
    #[serde(default)]
    pub frame1_id: Option<String>,
}

/// Build the image generation body.
pub fn build_image_request(params: &ImageParams, defaults: &ImageSettings) -> ImageGenerationRequest {
    let character_ref = params
        .character_ref
        .as_ref()
        .filter(|images| !images.is_empty())
        .map(|images| CharacterRef {
            identity0: CharacterIdentity {
                images: images.clone(),
            },
        });

    ImageGenerationRequest {
        prompt: params.prompt.clone(),
        aspect_ratio: or_default(&params.aspect_ratio, &defaults.aspect_ratio),
        model: or_default(&params.model, &defaults.model),
        image_ref: params.image_ref.clone().unwrap_or_default(),
        style_ref: params.style_ref.iter().cloned().collect(),
        character_ref,
        modify_image_ref: params.modify_image_ref.clone(),
    }
}

/// Build the video generation body.
pub fn build_video_request(params: &VideoParams, defaults: &VideoSettings) -> VideoGenerationRequest {
    VideoGenerationRequest {
        prompt: params.prompt.clone(),
        aspect_ratio: or_default(&params.aspect_ratio, &defaults.aspect_ratio),
        model: or_default(&params.model, &defaults.model),
        looping: params.looping.unwrap_or(false),
        resolution: or_default(&params.resolution, &defaults.resolution),
        duration: or_default(&params.duration, &defaults.duration),
        keyframes: Keyframes {
            frame0: keyframe(&params.frame0_image, &params.frame0_id),
            frame1: keyframe(&params.frame1_image, &params.frame1_id),
        },
    }
}

/// A generation id takes precedence over an image URL for the same slot.
fn keyframe(image: &Option<String>, generation_id: &Option<String>) -> Option<Keyframe> {
    if let Some(id) = non_empty(generation_id) {
        return Some(Keyframe::Generation {
            id: id.to_lowercase(),
        });
    }
    non_empty(image).map(|url| Keyframe::Image {
        url: url.to_string(),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn or_default(value: &Option<String>, default: &str) -> String {
    non_empty(value).unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image_params(prompt: &str) -> ImageParams {
        ImageParams {
            prompt: prompt.to_string(),
            ..ImageParams::default()
        }
    }

    fn video_params(prompt: &str) -> VideoParams {
        VideoParams {
            prompt: prompt.to_string(),
            ..VideoParams::default()
        }
    }

    #[test]
    fn test_minimal_image_body() {
        let request = build_image_request(&image_params("a red fox"), &ImageSettings::default());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"prompt": "a red fox", "aspect_ratio": "16:9", "model": "photon-1"})
        );
    }

    #[test]
    fn test_character_ref_only_when_non_empty() {
        let defaults = ImageSettings::default();

        let mut params = image_params("a knight");
        params.character_ref = Some(vec![]);
        let body = serde_json::to_value(build_image_request(&params, &defaults)).unwrap();
        assert!(body.get("character_ref").is_none());

        params.character_ref = Some(vec!["https://a/face.png".to_string()]);
        let body = serde_json::to_value(build_image_request(&params, &defaults)).unwrap();
        assert_eq!(
            body["character_ref"],
            json!({"identity0": {"images": ["https://a/face.png"]}})
        );
    }

    #[test]
    fn test_all_references() {
        let params: ImageParams = serde_json::from_value(json!({
            "prompt": "a castle",
            "aspect_ratio": "1:1",
            "model": "photon-flash-1",
            "image_ref": [{"url": "https://a/1.png", "weight": 0.5}, {"url": "https://a/2.png"}],
            "style_ref": {"url": "https://a/style.png", "weight": 0.8},
            "modify_image_ref": {"url": "https://a/base.png", "weight": 0.3}
        }))
        .unwrap();

        let body = serde_json::to_value(build_image_request(&params, &ImageSettings::default()))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": "a castle",
                "aspect_ratio": "1:1",
                "model": "photon-flash-1",
                "image_ref": [
                    {"url": "https://a/1.png", "weight": 0.5},
                    {"url": "https://a/2.png", "weight": 1.0}
                ],
                "style_ref": [{"url": "https://a/style.png", "weight": 0.8}],
                "modify_image_ref": {"url": "https://a/base.png", "weight": 0.3}
            })
        );
    }

    #[test]
    fn test_empty_image_ref_list_is_omitted() {
        let mut params = image_params("a lake");
        params.image_ref = Some(vec![]);
        let body = serde_json::to_value(build_image_request(&params, &ImageSettings::default()))
            .unwrap();
        assert!(body.get("image_ref").is_none());
    }

    #[test]
    fn test_video_defaults_without_keyframes() {
        let body = serde_json::to_value(build_video_request(
            &video_params("waves"),
            &VideoSettings::default(),
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": "waves",
                "aspect_ratio": "16:9",
                "model": "ray-2",
                "loop": false,
                "resolution": "720p",
                "duration": "5s"
            })
        );
    }

    #[test]
    fn test_generation_id_overrides_image_for_same_slot() {
        let mut params = video_params("morph");
        params.frame0_image = Some("https://a/start.png".to_string());
        params.frame0_id = Some("ABC-DEF".to_string());
        params.frame1_image = Some("https://a/end.png".to_string());

        let request = build_video_request(&params, &VideoSettings::default());
        assert_eq!(
            request.keyframes.frame0,
            Some(Keyframe::Generation {
                id: "abc-def".to_string()
            })
        );
        assert_eq!(
            request.keyframes.frame1,
            Some(Keyframe::Image {
                url: "https://a/end.png".to_string()
            })
        );

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["keyframes"]["frame0"], json!({"type": "generation", "id": "abc-def"}));
    }

    #[test]
    fn test_video_params_from_tool_arguments() {
        let params: VideoParams = serde_json::from_value(json!({
            "prompt": "timelapse",
            "loop": true,
            "resolution": "1080p",
            "duration": "9s",
            "frame1_id": "XYZ"
        }))
        .unwrap();

        let request = build_video_request(&params, &VideoSettings::default());
        assert!(request.looping);
        assert_eq!(request.resolution, "1080p");
        assert_eq!(request.duration, "9s");
        assert!(request.keyframes.frame0.is_none());
        assert_eq!(
            request.keyframes.frame1,
            Some(Keyframe::Generation {
                id: "xyz".to_string()
            })
        );
    }
}
