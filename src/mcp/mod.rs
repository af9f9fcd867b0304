//! MCP (Model Context Protocol) server for luma-mcp.
//!
//! Exposes `create_image` and `create_video` to AI assistants.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
