//! Server manifest

use serde::{Deserialize, Serialize};

/// Identity reported to MCP clients during `initialize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerManifest {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

impl ServerManifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServerManifest {
    fn default() -> Self {
        Self::new("factorio-mcp-server", env!("CARGO_PKG_VERSION"))
    }
}
