//! MCP tool definitions and result rendering.

use super::protocol::{Tool, ToolCallResult, ToolContent};
use crate::builder::{ImageParams, VideoParams};
use crate::error::{LumaError, Result};
use crate::generator::{Generator, ImageOutput, VideoOutput};
use crate::luma::LumaApi;
use crate::media::ImageHandle;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub const CREATE_IMAGE: &str = "create_image";
pub const CREATE_VIDEO: &str = "create_video";

fn image_ref_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "properties": {
            "url": {"type": "string", "description": "URL of the reference image"},
            "weight": {
                "type": "number",
                "description": "Influence of the reference (0.0-1.0)",
                "default": 1.0
            }
        },
        "required": ["url"]
    })
}

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: CREATE_IMAGE.to_string(),
            description: "Generate an image with Luma Photon. Returns the image, its CDN URL and \
                the generation id, which can be used as a video keyframe. Be as specific as \
                possible in the prompt and enhance it as needed."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Text description of the image to generate"
                    },
                    "aspect_ratio": {
                        "type": "string",
                        "description": "1:1, 16:9, 9:16, 4:3, 3:4, 21:9 or 9:21",
                        "default": "16:9"
                    },
                    "model": {
                        "type": "string",
                        "description": "photon-1 (higher quality) or photon-flash-1 (faster)",
                        "default": "photon-1"
                    },
                    "image_ref": {
                        "type": "array",
                        "description": "Up to 8 reference images with weights",
                        "items": image_ref_schema("Reference image")
                    },
                    "style_ref": image_ref_schema("A single image whose style to follow"),
                    "character_ref": {
                        "type": "array",
                        "description": "Up to 4 image URLs of the same character",
                        "items": {"type": "string"}
                    },
                    "modify_image_ref": image_ref_schema("A single image to modify")
                },
                "required": ["prompt"]
            }),
        },
        Tool {
            name: CREATE_VIDEO.to_string(),
            description: "Generate a video with Luma Ray. Returns a thumbnail, the video and \
                thumbnail CDN URLs and the generation id. Start and end frames can be given as \
                image URLs or as ids of earlier generations. Be as specific as possible in the \
                prompt and enhance it as needed."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Text description of the video to generate"
                    },
                    "aspect_ratio": {
                        "type": "string",
                        "description": "1:1, 16:9, 9:16, 4:3, 3:4, 21:9 or 9:21",
                        "default": "16:9"
                    },
                    "model": {
                        "type": "string",
                        "description": "ray-2 (standard), ray-flash-2 (faster) or ray-1-6 (legacy)",
                        "default": "ray-2"
                    },
                    "loop": {
                        "type": "boolean",
                        "description": "Whether the video should loop seamlessly",
                        "default": false
                    },
                    "resolution": {
                        "type": "string",
                        "description": "540p, 720p, 1080p or 4k",
                        "default": "720p"
                    },
                    "duration": {
                        "type": "string",
                        "description": "5s or 9s",
                        "default": "5s"
                    },
                    "frame0_image": {"type": "string", "description": "URL of the first frame"},
                    "frame1_image": {"type": "string", "description": "URL of the last frame"},
                    "frame0_id": {
                        "type": "string",
                        "description": "Generation id to use as the first frame (overrides frame0_image)"
                    },
                    "frame1_id": {
                        "type": "string",
                        "description": "Generation id to use as the last frame (overrides frame1_image)"
                    }
                },
                "required": ["prompt"]
            }),
        },
    ]
}

fn parse_args<T: DeserializeOwned>(args: Option<Value>) -> Result<T> {
    let args = args.ok_or_else(|| LumaError::InvalidInput("Missing arguments".to_string()))?;
    serde_json::from_value(args).map_err(|e| LumaError::InvalidInput(e.to_string()))
}

/// Run `create_image` and render its outcome.
pub async fn call_create_image<A: LumaApi>(
    generator: &Generator<A>,
    args: Option<Value>,
) -> ToolCallResult {
    let outcome = match parse_args::<ImageParams>(args) {
        Ok(params) => generator.create_image(&params).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(output) => image_result(output),
        Err(e) => error_result(CREATE_IMAGE, &e),
    }
}

/// Run `create_video` and render its outcome.
pub async fn call_create_video<A: LumaApi>(
    generator: &Generator<A>,
    args: Option<Value>,
) -> ToolCallResult {
    let outcome = match parse_args::<VideoParams>(args) {
        Ok(params) => generator.create_video(&params).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(output) => video_result(output),
        Err(e) => error_result(CREATE_VIDEO, &e),
    }
}

fn image_content(image: &ImageHandle) -> ToolContent {
    ToolContent::Image {
        data: image.to_base64(),
        mime_type: image.mime_type.clone(),
    }
}

pub fn image_result(output: ImageOutput) -> ToolCallResult {
    ToolCallResult::new(vec![
        image_content(&output.image),
        ToolContent::text(format!("image_url: {}", output.image_url)),
        ToolContent::text(format!("generation_id: {}", output.generation_id)),
    ])
}

pub fn video_result(output: VideoOutput) -> ToolCallResult {
    ToolCallResult::new(vec![
        image_content(&output.thumbnail),
        ToolContent::text("above image is the thumbnail of the video"),
        ToolContent::text(format!("video_url: {}", output.video_url)),
        ToolContent::text(format!("image_url: {}", output.image_url)),
        ToolContent::text(format!("generation_id: {}", output.generation_id)),
    ])
}

/// Render a failed tool call as `error in <tool>: <message>` plus kind and causes.
pub fn error_result(tool: &str, error: &LumaError) -> ToolCallResult {
    let mut text = format!("error in {}: {}\n\nkind: {}", tool, error, error.kind());

    let mut source = std::error::Error::source(error);
    if source.is_some() {
        text.push_str("\n\nCaused by:");
    }
    while let Some(cause) = source {
        text.push_str(&format!("\n    {}", cause));
        source = cause.source();
    }

    ToolCallResult::error(text)
}
