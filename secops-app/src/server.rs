use anyhow::{Context, Result};
use secops_tools::ToolGateway;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "secops-mcp";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

const WRAPPER_SUFFIX: &str = "_wrapper";
/// Legacy names whose prefix is not the tool name.
const RENAMED_WRAPPERS: &[(&str, &str)] = &[
    ("nuclei_scan_wrapper", "nuclei"),
    ("wp_scan_wrapper", "wpscan"),
];
const STATUS_TOOL: &str = "get_tools_status";
const PING_TOOL: &str = "ping_tool";

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct PingArguments {
    tool_name: String,
}

struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// JSON-RPC front end over the gateway. One message per line in each
/// direction.
pub struct McpServer {
    gateway: Arc<ToolGateway>,
}

impl McpServer {
    pub fn new(gateway: Arc<ToolGateway>) -> Self {
        Self { gateway }
    }

    /// Serve until `reader` reaches EOF. Requests run concurrently; all
    /// responses funnel through one writer task so lines never interleave.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<Value>();
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let mut in_flight = JoinSet::new();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await.context("Failed to read request")? {
            if tx.is_closed() {
                warn!("Response writer gone, no longer accepting requests");
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            in_flight.spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    // Receiver only goes away when the writer failed.
                    let _ = tx.send(response);
                }
            });

            // Reap finished handlers so the set does not grow unbounded.
            while in_flight.try_join_next().is_some() {}
        }

        while in_flight.join_next().await.is_some() {}
        drop(tx);

        writer_task.await.context("Response writer panicked")??;
        info!("Input closed, server stopping");
        Ok(())
    }

    /// Handle one raw line. `None` means nothing is sent back.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Malformed request");
                return Some(error_response(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };

        let id = value.get("id").cloned();
        let request: Request = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(error_response(
                    id.unwrap_or(Value::Null),
                    RpcError::new(INVALID_REQUEST, format!("Invalid request: {e}")),
                ));
            }
        };

        self.handle_request(request).await
    }

    async fn handle_request(&self, request: Request) -> Option<Value> {
        debug!(method = %request.method, "Request received");

        let Some(id) = request.id else {
            debug!(method = %request.method, "Notification ignored");
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {other}"))),
        };

        Some(match outcome {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(e) => error_response(id, e),
        })
    }

    fn initialize(&self, params: &Value) -> Value {
        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);

        json!({
            "protocolVersion": version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn list_tools(&self) -> Value {
        let mut tools = self.gateway.registry().schemas();
        tools.push(json!({
            "name": STATUS_TOOL,
            "description": "Report availability of every security tool",
            "inputSchema": { "type": "object", "properties": {} }
        }));
        tools.push(json!({
            "name": PING_TOOL,
            "description": "Check whether a single security tool can run",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tool_name": { "type": "string", "description": "Tool to check" }
                },
                "required": ["tool_name"]
            }
        }));
        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, RpcError> {
        let call: CallParams = serde_json::from_value(params)
            .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;
        let payload = match resolve_tool_name(&call.name) {
            STATUS_TOOL => self.gateway.get_tools_status().await,
            PING_TOOL => {
                let args: PingArguments = serde_json::from_value(call.arguments)
                    .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;
                self.gateway.ping_tool(&args.tool_name).await
            }
            tool => {
                let envelope = self.gateway.dispatch(tool, call.arguments).await;
                serde_json::to_value(&envelope)
                    .map_err(|e| RpcError::new(INTERNAL_ERROR, e.to_string()))?
            }
        };

        let is_error = !payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(json!({
            "content": [{ "type": "text", "text": payload.to_string() }],
            "isError": is_error
        }))
    }
}

/// Map a requested name onto the registry name. Accepts both the bare
/// name and the `<tool>_wrapper` form.
pub fn resolve_tool_name(name: &str) -> &str {
    if let Some((_, tool)) = RENAMED_WRAPPERS.iter().find(|(legacy, _)| *legacy == name) {
        return tool;
    }
    name.strip_suffix(WRAPPER_SUFFIX).unwrap_or(name)
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": error.code, "message": error.message }
    })
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Value>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = response.to_string();
        line.push('\n');
        writer
            .write_all(line.as_bytes())
            .await
            .context("Failed to write response")?;
        writer.flush().await.context("Failed to flush response")?;
    }
    Ok(())
}
