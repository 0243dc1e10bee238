//! # factorio-mcp-core
//!
//! Core types shared by the Factorio RCON MCP bridge:
//! - Error type and result alias
//! - Server manifest reported during MCP initialization

pub mod error;
pub mod manifest;

pub use error::{FactorioMcpError, Result, error_codes};
pub use manifest::ServerManifest;
