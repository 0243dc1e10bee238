//! stdio transport for MCP JSON-RPC

use crate::McpServer;
use crate::environment::RconEnvironment;
use crate::mcp::{
    InitializeParams, InitializeResult, PROTOCOL_VERSION, Request, RequestId, Response,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::tools::{handle_tool_call, list_tools};
use factorio_mcp_core::{FactorioMcpError, Result, error_codes};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// Run the MCP server on stdio
pub async fn run<E: RconEnvironment>(server: McpServer<E>) -> Result<()> {
    info!("Factorio MCP server starting on stdio");
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(&server, reader, writer).await
}

/// Serve newline-delimited JSON-RPC until the reader reaches EOF
///
/// Requests are handled one at a time, in arrival order.
pub async fn serve<E, R, W>(server: &McpServer<E>, mut reader: R, mut writer: W) -> Result<()>
where
    E: RconEnvironment,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| FactorioMcpError::Io(format!("Failed to read stdin: {}", e)))?;

        if bytes_read == 0 {
            info!("Client disconnected (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) => match request.id.clone() {
                Some(id) => handle_request(&request, id, server).await,
                None => {
                    debug!("Notification: {}", request.method);
                    continue;
                }
            },
            Err(e) => {
                error!("Failed to parse request: {}", e);
                // Malformed requests that still carry an id get an answer
                match recover_id(trimmed) {
                    Some(id) => Response::error(
                        id,
                        error_codes::INVALID_REQUEST,
                        format!("Invalid request: {}", e),
                    ),
                    None => continue,
                }
            }
        };

        let response_json = serde_json::to_string(&response)?;

        debug!("Sending: {}", response_json);

        writer
            .write_all(response_json.as_bytes())
            .await
            .map_err(|e| FactorioMcpError::Io(format!("Failed to write stdout: {}", e)))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| FactorioMcpError::Io(format!("Failed to write newline: {}", e)))?;
        writer
            .flush()
            .await
            .map_err(|e| FactorioMcpError::Io(format!("Failed to flush stdout: {}", e)))?;
    }

    Ok(())
}

/// The `id` of a JSON object that is not a valid request
fn recover_id(line: &str) -> Option<RequestId> {
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    match value.get("id")? {
        serde_json::Value::Null => None,
        id => serde_json::from_value(id.clone()).ok(),
    }
}

async fn handle_request<E: RconEnvironment>(
    request: &Request,
    id: RequestId,
    server: &McpServer<E>,
) -> Response {
    match request.method.as_str() {
        "initialize" => handle_initialize(request, id, server),
        "ping" => Response::success(id, serde_json::json!({})),
        "tools/list" => handle_tools_list(id),
        "tools/call" => handle_tools_call(request, id, server).await,
        _ => Response::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

fn handle_initialize<E: RconEnvironment>(
    request: &Request,
    id: RequestId,
    server: &McpServer<E>,
) -> Response {
    let params: InitializeParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid initialize params: {}", e),
            );
        }
    };

    info!(
        "Client {} v{} connected (protocol {})",
        params.client_info.name, params.client_info.version, params.protocol_version
    );

    let manifest = server.manifest();
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
        },
        server_info: ServerInfo {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
        },
    };

    match serde_json::to_value(result) {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    }
}

fn handle_tools_list(id: RequestId) -> Response {
    let tools = list_tools();
    Response::success(id, serde_json::json!({ "tools": tools }))
}

async fn handle_tools_call<E: RconEnvironment>(
    request: &Request,
    id: RequestId,
    server: &McpServer<E>,
) -> Response {
    #[derive(serde::Deserialize)]
    struct ToolCallParams {
        name: String,
        #[serde(default)]
        arguments: serde_json::Value,
    }

    let params: ToolCallParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid tool call params: {}", e),
            );
        }
    };

    handle_tool_call(&params.name, params.arguments, id, server.environment().as_ref()).await
}
