//! # factorio-mcp-server
//!
//! MCP server exposing Factorio console operations as tools.
//!
//! This crate provides:
//! - `RconEnvironment` trait for implementing the console backend
//! - MCP JSON-RPC protocol handling
//! - Tool definitions and dispatch (get_server_status, execute_command, etc.)
//! - Newline-delimited stdio transport

pub mod environment;
pub mod mcp;
pub mod tools;
pub mod transport;

pub use environment::RconEnvironment;

use factorio_mcp_core::{Result, ServerManifest};
use std::sync::Arc;

/// Factorio MCP server
pub struct McpServer<E: RconEnvironment> {
    /// Console backend
    environment: Arc<E>,
    /// Server identity
    manifest: ServerManifest,
}

impl<E: RconEnvironment> McpServer<E> {
    /// Create a new server with the given backend
    pub fn new(environment: E, manifest: ServerManifest) -> Self {
        Self {
            environment: Arc::new(environment),
            manifest,
        }
    }

    /// Run the server on stdio transport
    pub async fn run_stdio(self) -> Result<()> {
        transport::stdio::run(self).await
    }

    /// Get the server manifest
    pub fn manifest(&self) -> &ServerManifest {
        &self.manifest
    }

    /// Get the console backend
    pub fn environment(&self) -> &Arc<E> {
        &self.environment
    }
}
