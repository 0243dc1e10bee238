//! Console backend trait

use async_trait::async_trait;
use factorio_mcp_core::Result;

/// Operations the MCP tools are built on
///
/// Implement this trait to expose a game server's console as MCP tools.
/// Every method performs one independent request against the server and
/// returns the text to hand back to the client.
#[async_trait]
pub trait RconEnvironment: Send + Sync + 'static {
    /// Summary of the server: base version, tick, player and surface counts
    async fn server_status(&self) -> Result<String>;

    /// Connected players, one per line
    async fn list_players(&self) -> Result<String>;

    /// Elapsed game time derived from the current tick
    async fn game_time(&self) -> Result<String>;

    /// Main inventory of a player, or of the first connected player
    async fn player_inventory(&self, player_name: Option<&str>) -> Result<String>;

    /// Run a free-form console command
    async fn execute_command(&self, command: &str, silent: bool) -> Result<String>;
}
