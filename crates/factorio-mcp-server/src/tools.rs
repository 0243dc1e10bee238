//! MCP tool handlers for the Factorio console

use factorio_mcp_core::{FactorioMcpError, Result, error_codes};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::environment::RconEnvironment;
use crate::mcp::{RequestId, Response, ToolResult};

/// Tool definition for MCP tools/list
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

fn no_arguments() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {}
    })
}

/// Get list of available tools
pub fn list_tools() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "get_server_status".into(),
            description: "Get Factorio server status: base game version, current tick, connected player count and surface count.".into(),
            input_schema: no_arguments(),
        },
        ToolDef {
            name: "list_players".into(),
            description: "List players currently connected to the server.".into(),
            input_schema: no_arguments(),
        },
        ToolDef {
            name: "get_game_time".into(),
            description: "Get elapsed in-game time as days, hours and minutes, plus the total tick count.".into(),
            input_schema: no_arguments(),
        },
        ToolDef {
            name: "get_player_inventory".into(),
            description: "Get the main inventory of a connected player. Defaults to the first connected player when no name is given.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "player_name": {
                        "type": "string",
                        "description": "Name of the player. Example: \"Alice\""
                    }
                }
            }),
        },
        ToolDef {
            name: "execute_command".into(),
            description: "Execute a console command or Lua snippet. Text without a leading '/' is run as Lua via /silent-command (or /c when silent is false). Use rcon.print(...) to return values.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "Command to execute. Example: \"/time\" or \"rcon.print(game.tick)\""
                    },
                    "silent": {
                        "type": "boolean",
                        "description": "Whether to use silent-command (no in-game notification)",
                        "default": true
                    }
                },
                "required": ["command"]
            }),
        },
    ]
}

/// Parameters for get_player_inventory
#[derive(Debug, Default, Deserialize)]
pub struct PlayerInventoryParams {
    #[serde(default)]
    pub player_name: Option<String>,
}

/// Parameters for execute_command
#[derive(Debug, Deserialize)]
pub struct ExecuteCommandParams {
    pub command: String,
    #[serde(default = "default_silent")]
    pub silent: bool,
}

fn default_silent() -> bool {
    true
}

/// Decode tool arguments, treating a missing/null value as `{}`
fn parse_args<T: serde::de::DeserializeOwned>(params: serde_json::Value) -> Result<T> {
    let params = if params.is_null() {
        serde_json::json!({})
    } else {
        params
    };
    serde_json::from_value(params)
        .map_err(|e| FactorioMcpError::InvalidArgument(format!("Invalid tool arguments: {}", e)))
}

/// Handle a tools/call request
///
/// Failures of the console backend become error-flagged tool results so the
/// client always gets a well-formed answer; only unknown tools and
/// undecodable arguments are reported as JSON-RPC errors.
pub async fn handle_tool_call<E: RconEnvironment>(
    name: &str,
    params: serde_json::Value,
    id: RequestId,
    environment: &E,
) -> Response {
    let result = match name {
        "get_server_status" => environment.server_status().await,
        "list_players" => environment.list_players().await,
        "get_game_time" => environment.game_time().await,
        "get_player_inventory" => match parse_args::<PlayerInventoryParams>(params) {
            Ok(p) => environment.player_inventory(p.player_name.as_deref()).await,
            Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, e.to_string()),
        },
        "execute_command" => match parse_args::<ExecuteCommandParams>(params) {
            Ok(p) => environment.execute_command(&p.command, p.silent).await,
            Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, e.to_string()),
        },
        _ => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", name),
            );
        }
    };

    let tool_result = match result {
        Ok(text) => ToolResult::text(text),
        Err(e) => {
            warn!("Tool {} failed: {}", name, e);
            ToolResult::error(format!("Error occurred: {}", e))
        }
    };

    match serde_json::to_value(tool_result) {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    }
}
