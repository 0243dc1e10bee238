//! RCON command adapter
//!
//! Commands are delivered by spawning the external `rcon` client once per
//! call. The client's trimmed stdout is the response; a spawn failure or a
//! non-zero exit is an error, and so is running past the configured timeout.

use crate::command::ConsoleCommand;
use crate::config::RconConfig;
use async_trait::async_trait;
use factorio_mcp_core::{FactorioMcpError, Result};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Sends an already-normalized command and returns the server's reply
#[async_trait]
pub trait CommandRunner: Send + Sync + 'static {
    async fn run(&self, command: &str) -> Result<String>;
}

/// Runs commands through the external `rcon` client
#[derive(Debug, Clone)]
pub struct RconCli {
    config: Arc<RconConfig>,
}

impl RconCli {
    pub fn new(config: Arc<RconConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CommandRunner for RconCli {
    async fn run(&self, command: &str) -> Result<String> {
        let config = &self.config;
        debug!("RCON exec ({}): {}", config.connection, command);

        let child = Command::new(&config.rcon_bin)
            .args(config.args(command))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                FactorioMcpError::Execution(format!(
                    "failed to start {}: {}",
                    config.rcon_bin.display(),
                    e
                ))
            })?;

        // Dropping the wait future on timeout kills the child
        let output = match timeout(config.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| {
                FactorioMcpError::Execution(format!(
                    "failed to wait for {}: {}",
                    config.rcon_bin.display(),
                    e
                ))
            })?,
            Err(_) => {
                warn!("RCON command timed out after {:?}", config.timeout);
                return Err(FactorioMcpError::Timeout(config.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let message = if stderr.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {}", output.status, stderr)
            };
            warn!("RCON command failed: {}", message);
            return Err(FactorioMcpError::Execution(message));
        }

        let response = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(
            "RCON response: {}",
            response.chars().take(100).collect::<String>()
        );
        Ok(response)
    }
}

/// Normalizes commands and hands them to a [`CommandRunner`]
pub struct RconClient<R: CommandRunner = RconCli> {
    runner: R,
}

impl RconClient<RconCli> {
    /// Client backed by the external `rcon` binary
    pub fn from_config(config: Arc<RconConfig>) -> Self {
        Self::new(RconCli::new(config))
    }
}

impl<R: CommandRunner> RconClient<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Execute a command, prefixing bare Lua with the silent or plain marker
    pub async fn execute(&self, command: &str, silent: bool) -> Result<String> {
        let command = ConsoleCommand::new(command, silent)?;
        self.runner.run(&command.normalized()).await
    }

    /// Execute a Lua chunk via `/silent-command`
    ///
    /// Only values passed to `rcon.print` come back in the response.
    pub async fn lua(&self, lua_code: &str) -> Result<String> {
        self.execute(lua_code, true).await
    }
}
