//! Factorio bridge implementing the RconEnvironment trait
//!
//! Each tool is one Lua chunk sent through the RCON adapter, with light
//! post-processing of what comes back.

use crate::config::RconConfig;
use crate::lua::{self, PlayerName};
use crate::payload;
use crate::rcon::{CommandRunner, RconCli, RconClient};
use async_trait::async_trait;
use factorio_mcp_core::{Result, ServerManifest};
use factorio_mcp_server::RconEnvironment;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bridge to a Factorio server's console
pub struct FactorioBridge<R: CommandRunner = RconCli> {
    rcon: RconClient<R>,
}

impl FactorioBridge<RconCli> {
    /// Create a bridge that drives the external `rcon` client
    pub fn with_config(config: Arc<RconConfig>) -> Self {
        info!("Factorio bridge using {} via {}", config.connection, config.rcon_bin.display());
        Self::with_runner(RconCli::new(config))
    }
}

impl<R: CommandRunner> FactorioBridge<R> {
    /// Create a bridge over any command runner
    pub fn with_runner(runner: R) -> Self {
        Self {
            rcon: RconClient::new(runner),
        }
    }

    pub fn rcon(&self) -> &RconClient<R> {
        &self.rcon
    }

    pub fn manifest(&self) -> ServerManifest {
        ServerManifest::default()
    }
}

#[async_trait]
impl<R: CommandRunner> RconEnvironment for FactorioBridge<R> {
    async fn server_status(&self) -> Result<String> {
        self.rcon.lua(&lua::server_status()).await
    }

    async fn list_players(&self) -> Result<String> {
        let raw = self.rcon.lua(&lua::list_players()).await?;
        match payload::parse_players(&raw) {
            Ok(players) => {
                debug!("{} players connected", players.len());
                Ok(payload::format_players(&players))
            }
            Err(e) => {
                warn!("Unrecognized player list ({}), returning raw output", e);
                Ok(raw)
            }
        }
    }

    async fn game_time(&self) -> Result<String> {
        let raw = self.rcon.lua(&lua::game_tick()).await?;
        match raw.parse::<u64>() {
            Ok(tick) => Ok(payload::format_game_time(tick)),
            Err(e) => {
                warn!("Unrecognized tick ({}), returning raw output", e);
                Ok(raw)
            }
        }
    }

    async fn player_inventory(&self, player_name: Option<&str>) -> Result<String> {
        let player = player_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(PlayerName::parse)
            .transpose()?;

        let raw = self.rcon.lua(&lua::player_inventory(player.as_ref())).await?;
        let report = match payload::parse_inventory(&raw) {
            Ok(report) => report,
            Err(e) => {
                warn!("Unrecognized inventory ({}), returning raw output", e);
                return Ok(raw);
            }
        };

        if !report.found {
            return Ok(match player {
                Some(name) => format!("Player not found: {}", name),
                None => payload::format_players(&[]),
            });
        }

        let name = report
            .name
            .or_else(|| player.map(|p| p.as_str().to_string()))
            .unwrap_or_default();
        Ok(payload::format_inventory(&name, &report.contents))
    }

    async fn execute_command(&self, command: &str, silent: bool) -> Result<String> {
        self.rcon.execute(command, silent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factorio_mcp_core::FactorioMcpError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records sent commands and replays canned replies
    #[derive(Default)]
    struct ScriptedRunner {
        sent: Mutex<Vec<String>>,
        replies: Mutex<VecDeque<Result<String>>>,
    }

    impl ScriptedRunner {
        fn replying(replies: Vec<Result<String>>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                replies: Mutex::new(replies.into()),
            }
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, command: &str) -> Result<String> {
            self.sent.lock().unwrap().push(command.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn bridge(replies: Vec<Result<String>>) -> FactorioBridge<ScriptedRunner> {
        FactorioBridge::with_runner(ScriptedRunner::replying(replies))
    }

    fn sent(bridge: &FactorioBridge<ScriptedRunner>) -> Vec<String> {
        bridge.rcon().runner().sent.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_execute_command_default_matches_explicit_silent() {
        let bridge = bridge(vec![]);
        bridge.execute_command("status", true).await.unwrap();
        bridge
            .execute_command("/silent-command status", true)
            .await
            .unwrap();

        let sent = sent(&bridge);
        assert_eq!(sent[0], "/silent-command status");
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn test_execute_command_plain_and_prefixed() {
        let bridge = bridge(vec![Ok("ok".into())]);
        assert_eq!(bridge.execute_command("game.speed = 2", false).await.unwrap(), "ok");
        bridge.execute_command("/time", false).await.unwrap();

        assert_eq!(sent(&bridge), vec!["/c game.speed = 2", "/time"]);
    }

    #[tokio::test]
    async fn test_server_status_is_silent_print() {
        let bridge = bridge(vec![Ok(
            "Version: 1.1.110, Tick: 42, Players: 1, Surfaces: 1".into()
        )]);
        let status = bridge.server_status().await.unwrap();

        assert_eq!(status, "Version: 1.1.110, Tick: 42, Players: 1, Surfaces: 1");
        assert!(sent(&bridge)[0].starts_with("/silent-command rcon.print(\"Version: \""));
    }

    #[tokio::test]
    async fn test_list_players_empty() {
        for reply in ["{}", "[]", ""] {
            let bridge = bridge(vec![Ok(reply.into())]);
            assert_eq!(bridge.list_players().await.unwrap(), "No players connected");
        }
    }

    #[tokio::test]
    async fn test_list_players_formats_names() {
        let bridge = bridge(vec![Ok(
            r#"[{"name":"Alice","position":{"x":0,"y":0}},{"name":"Bob"}]"#.into()
        )]);
        assert_eq!(
            bridge.list_players().await.unwrap(),
            "Connected players (2):\n- Alice at (0.0, 0.0)\n- Bob"
        );
    }

    #[tokio::test]
    async fn test_list_players_falls_back_to_raw() {
        let bridge = bridge(vec![Ok("Cannot execute command. Error: boom".into())]);
        assert_eq!(
            bridge.list_players().await.unwrap(),
            "Cannot execute command. Error: boom"
        );
    }

    #[tokio::test]
    async fn test_game_time() {
        let bridge = bridge(vec![Ok("5400000".into())]);
        assert_eq!(
            bridge.game_time().await.unwrap(),
            "Game time: 1 days, 1 hours, 0 minutes (Total ticks: 5400000)"
        );
        assert_eq!(sent(&bridge), vec!["/silent-command rcon.print(game.tick)"]);
    }

    #[tokio::test]
    async fn test_inventory_player_not_found() {
        let bridge = bridge(vec![Ok(r#"{"found":false}"#.into())]);
        assert_eq!(
            bridge.player_inventory(Some("Alice")).await.unwrap(),
            "Player not found: Alice"
        );
        assert!(sent(&bridge)[0].contains(r#"game.get_player("Alice")"#));
    }

    #[tokio::test]
    async fn test_inventory_without_name_and_no_players() {
        let bridge = bridge(vec![Ok(r#"{"found":false}"#.into())]);
        assert_eq!(
            bridge.player_inventory(Some("  ")).await.unwrap(),
            "No players connected"
        );
        assert!(sent(&bridge)[0].contains("game.connected_players[1]"));
    }

    #[tokio::test]
    async fn test_inventory_contents() {
        let bridge = bridge(vec![Ok(
            r#"{"found":true,"name":"Bob","contents":{"iron-plate":50}}"#.into()
        )]);
        assert_eq!(
            bridge.player_inventory(None).await.unwrap(),
            "Inventory of Bob:\n- iron-plate: 50"
        );
    }

    #[tokio::test]
    async fn test_inventory_rejects_injection_without_sending() {
        let bridge = bridge(vec![]);
        let err = bridge
            .player_inventory(Some(r#"x") game.print("pwned"#))
            .await
            .unwrap_err();

        assert!(matches!(err, FactorioMcpError::InvalidArgument(_)));
        assert!(sent(&bridge).is_empty());
    }

    #[tokio::test]
    async fn test_runner_failure_propagates() {
        let bridge = bridge(vec![Err(FactorioMcpError::Execution("exit status: 1".into()))]);
        let err = bridge.list_players().await.unwrap_err();
        assert!(matches!(err, FactorioMcpError::Execution(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_rcon_client_becomes_error_result() {
        use factorio_mcp_server::mcp::RequestId;
        use factorio_mcp_server::tools::handle_tool_call;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let rcon_bin = dir.path().join("rcon");
        std::fs::write(&rcon_bin, "#!/bin/sh\necho 'connection refused' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&rcon_bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = RconConfig::config_file("/etc/rcon.yaml").with_rcon_bin(rcon_bin);
        let bridge = FactorioBridge::with_config(Arc::new(config));

        let response = handle_tool_call(
            "execute_command",
            serde_json::json!({ "command": "status" }),
            RequestId::Number(1),
            &bridge,
        )
        .await;

        assert!(response.error.is_none());
        let result = response.result.expect("tool result");
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error occurred: Failed to execute RCON command"), "{}", text);
        assert!(text.contains("connection refused"), "{}", text);
    }

    #[test]
    fn test_manifest() {
        let bridge = bridge(vec![]);
        assert_eq!(bridge.manifest().name, "factorio-mcp-server");
    }
}
