//! MCP server implementation.

use super::protocol::*;
use super::tools::{self, get_tools, CREATE_IMAGE, CREATE_VIDEO};
use crate::config::Settings;
use crate::generator::Generator;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "luma-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server exposing the Luma generation tools.
pub struct McpServer {
    settings: Arc<Settings>,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    ///
    /// Each request runs on its own task; a single writer task owns stdout.
    pub async fn run(&self) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(response) = rx.recv().await {
                let mut line = serde_json::to_string(&response)?;
                line.push('\n');
                stdout.write_all(line.as_bytes()).await?;
                stdout.flush().await?;
            }
            anyhow::Ok(())
        });

        info!("luma-mcp server starting");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    let _ = tx.send(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
                    continue;
                }
            };

            let settings = Arc::clone(&self.settings);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = handle_request(&settings, request).await {
                    let _ = tx.send(response);
                }
            });
        }

        info!("stdin closed, waiting for in-flight requests");
        drop(tx);
        writer.await??;
        Ok(())
    }
}

/// Handle a single JSON-RPC message. Notifications produce no response.
pub(crate) async fn handle_request(
    settings: &Settings,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    debug!(method = %request.method, "Handling request");

    if request.is_notification() {
        return None;
    }

    if request.jsonrpc != JSONRPC_VERSION {
        warn!(version = %request.jsonrpc, "Rejecting request with unsupported JSON-RPC version");
        return Some(JsonRpcResponse::error(
            request.id,
            INVALID_REQUEST,
            &format!("Unsupported JSON-RPC version: {}", request.jsonrpc),
        ));
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(request.id),
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => handle_tools_list(request.id),
        "tools/call" => handle_tools_call(settings, request.id, request.params).await,
        _ => JsonRpcResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            &format!("Method not found: {}", request.method),
        ),
    };
    Some(response)
}

fn to_response<T: serde::Serialize>(id: Option<Value>, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, -32603, &format!("Internal error: {}", e)),
    }
}

fn handle_initialize(id: Option<Value>) -> JsonRpcResponse {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability { list_changed: false },
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
        },
    };
    to_response(id, result)
}

fn handle_tools_list(id: Option<Value>) -> JsonRpcResponse {
    to_response(id, ToolsListResult { tools: get_tools() })
}

async fn handle_tools_call(
    settings: &Settings,
    id: Option<Value>,
    params: Option<Value>,
) -> JsonRpcResponse {
    let params: ToolCallParams = match params {
        Some(p) => match serde_json::from_value(p) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
            }
        },
        None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
    };

    let name = params.name.as_str();
    if name != CREATE_IMAGE && name != CREATE_VIDEO {
        return to_response(id, ToolCallResult::error(format!("Unknown tool: {}", name)));
    }

    // Fresh HTTP client per invocation, dropped when the call finishes.
    let generator = match Generator::from_settings(settings) {
        Ok(generator) => generator,
        Err(e) => {
            error!("Cannot start {}: {}", name, e);
            return to_response(id, tools::error_result(name, &e));
        }
    };

    let result = if name == CREATE_IMAGE {
        tools::call_create_image(&generator, params.arguments).await
    } else {
        tools::call_create_video(&generator, params.arguments).await
    };

    if result.is_error == Some(true) {
        warn!("{} returned an error", name);
    }
    to_response(id, result)
}
