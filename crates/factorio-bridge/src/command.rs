//! Console command normalization
//!
//! Factorio treats text starting with `/` as a console command and anything
//! else as chat. Bare Lua is therefore prefixed with a command marker
//! exactly once before it is sent.

use factorio_mcp_core::{FactorioMcpError, Result};

/// Leading character of every console command
pub const ADMIN_PREFIX: char = '/';
/// Runs Lua without announcing it in chat
pub const SILENT_MARKER: &str = "/silent-command ";
/// Runs Lua and announces it in chat
pub const PLAIN_MARKER: &str = "/c ";

/// A console command ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleCommand {
    text: String,
    silent: bool,
}

impl ConsoleCommand {
    /// Create a command; surrounding whitespace is dropped
    pub fn new(text: &str, silent: bool) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FactorioMcpError::InvalidArgument(
                "Command must not be empty".to_string(),
            ));
        }
        Ok(Self {
            text: text.to_string(),
            silent,
        })
    }

    /// The exact text handed to the RCON client
    pub fn normalized(&self) -> String {
        normalize(&self.text, self.silent)
    }
}

/// Prefix `command` with the silent or plain marker unless it already
/// starts with `/`
pub fn normalize(command: &str, silent: bool) -> String {
    if command.starts_with(ADMIN_PREFIX) {
        command.to_string()
    } else if silent {
        format!("{}{}", SILENT_MARKER, command)
    } else {
        format!("{}{}", PLAIN_MARKER, command)
    }
}
