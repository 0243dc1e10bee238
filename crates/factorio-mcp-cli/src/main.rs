//! Factorio MCP Server
//!
//! Exposes a Factorio server's console as MCP tools over stdio. Commands
//! reach the game through the external `rcon` client, configured either by
//! its own config file or by address, port and password.

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use factorio_bridge::config::{
    DEFAULT_CONFIG_PATH, DEFAULT_RCON_BIN, DEFAULT_RCON_PORT, DEFAULT_SERVER_IP, expand_home,
};
use factorio_bridge::{FactorioBridge, RconConfig};
use factorio_mcp_server::McpServer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// How the `rcon` client is told where the server is
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConnectionMode {
    /// `rcon -c <config> <command>`
    ConfigFile,
    /// `rcon -a <ip>:<port> -p <password> <command>`
    Direct,
}

#[derive(Debug, Parser)]
#[command(name = "factorio-mcp")]
#[command(about = "MCP server for Factorio remote console commands")]
#[command(version)]
struct Cli {
    /// Factorio server address
    #[arg(long, env = "FACTORIO_SERVER_IP", default_value = DEFAULT_SERVER_IP)]
    server_ip: String,

    /// Factorio RCON port
    #[arg(long, env = "FACTORIO_RCON_PORT", default_value_t = DEFAULT_RCON_PORT)]
    rcon_port: u16,

    /// RCON password (selects direct mode unless --connection is given)
    #[arg(long, env = "FACTORIO_RCON_PASSWORD", hide_env_values = true)]
    rcon_password: Option<String>,

    /// Config file of the rcon client
    #[arg(long, env = "FACTORIO_RCON_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    rcon_config: String,

    /// Connection mode (inferred from --rcon-password when omitted)
    #[arg(long, value_enum, env = "FACTORIO_RCON_CONNECTION")]
    connection: Option<ConnectionMode>,

    /// rcon client binary
    #[arg(long, env = "RCON_BIN", default_value = DEFAULT_RCON_BIN)]
    rcon_bin: PathBuf,

    /// Seconds to wait for one rcon invocation
    #[arg(long, env = "FACTORIO_RCON_TIMEOUT", default_value_t = 30)]
    timeout_secs: u64,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn password(&self) -> Option<&str> {
        self.rcon_password.as_deref().filter(|p| !p.is_empty())
    }

    fn connection_mode(&self) -> ConnectionMode {
        self.connection.unwrap_or(if self.password().is_some() {
            ConnectionMode::Direct
        } else {
            ConnectionMode::ConfigFile
        })
    }

    fn rcon_config(&self) -> Result<RconConfig> {
        if self.timeout_secs == 0 {
            bail!("--timeout-secs must be greater than zero");
        }

        let config = match self.connection_mode() {
            ConnectionMode::ConfigFile => RconConfig::config_file(expand_home(&self.rcon_config)),
            ConnectionMode::Direct => {
                let Some(password) = self.password() else {
                    bail!("direct connection requires --rcon-password or FACTORIO_RCON_PASSWORD");
                };
                RconConfig::direct(&self.server_ip, self.rcon_port, password)
            }
        };

        Ok(config
            .with_rcon_bin(&self.rcon_bin)
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the protocol
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Arc::new(cli.rcon_config()?);
    info!(
        "Factorio MCP server starting ({}, timeout {:?})",
        config.connection, config.timeout
    );

    let bridge = FactorioBridge::with_config(config);
    let manifest = bridge.manifest();
    let server = McpServer::new(bridge, manifest);
    server.run_stdio().await?;

    info!("Factorio MCP server stopped");
    Ok(())
}
