use std::collections::BTreeMap;
use std::sync::Arc;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use crate::envelope::{normalize, ResultEnvelope};
use crate::error::ToolError;
use crate::registry::ToolRegistryImpl;
use crate::sandbox::{ProcessInvoker, SandboxProbe};
use crate::status::{ToolStatus, SANDBOX_KIND};
use crate::tools::Tool;

/// Entry point for callers: gates every job on sandbox availability, runs
/// the adapter and folds the outcome into a [`ResultEnvelope`].
pub struct ToolGateway {
    registry: Arc<ToolRegistryImpl>,
    probe: Arc<dyn SandboxProbe>,
    invoker: Arc<dyn ProcessInvoker>,
}

impl ToolGateway {
    pub fn new(
        registry: Arc<ToolRegistryImpl>,
        probe: Arc<dyn SandboxProbe>,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        Self {
            registry,
            probe,
            invoker,
        }
    }

    pub fn registry(&self) -> &ToolRegistryImpl {
        &self.registry
    }

    pub async fn dispatch(&self, tool_name: &str, input: Value) -> ResultEnvelope {
        info!(tool = tool_name, "Dispatching tool");

        let outcome = self.try_dispatch(tool_name, input).await;
        match &outcome {
            Ok(_) => info!(tool = tool_name, "Tool completed"),
            Err(e) => warn!(tool = tool_name, error = %e, "Tool failed"),
        }

        normalize(outcome)
    }

    async fn try_dispatch(&self, tool_name: &str, input: Value) -> Result<Value, ToolError> {
        if !self.probe.is_available().await {
            return Err(ToolError::SandboxUnavailable);
        }

        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        self.execute_isolated(tool, input).await
    }

    async fn execute_isolated(&self, tool: Arc<dyn Tool>, input: Value) -> Result<Value, ToolError> {
        let invoker = self.invoker.clone();
        let name = tool.name();

        // A panicking adapter must not take the gateway down with it.
        let handle = tokio::spawn(async move { tool.execute(invoker.as_ref(), input).await });

        match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                error!(tool = name, "Tool execution panicked");
                Err(ToolError::Internal(format!("{name} adapter panicked")))
            }
            Err(_) => {
                error!(tool = name, "Tool execution cancelled");
                Err(ToolError::Internal(format!("{name} adapter cancelled")))
            }
        }
    }

    pub async fn status(&self, tool_name: &str) -> Result<ToolStatus, ToolError> {
        if !self.registry.is_cataloged(tool_name) {
            return Err(ToolError::UnknownTool(tool_name.to_string()));
        }
        Ok(ToolStatus::new(tool_name, self.probe.is_available().await))
    }

    /// Every cataloged tool from a single availability check.
    pub async fn status_all(&self) -> BTreeMap<String, ToolStatus> {
        let available = self.probe.is_available().await;
        self.registry
            .catalog()
            .into_iter()
            .map(|name| {
                let status = ToolStatus::new(name.clone(), available);
                (name, status)
            })
            .collect()
    }

    pub async fn get_tools_status(&self) -> Value {
        let statuses = self.status_all().await;
        let available = statuses.values().all(|s| s.available);
        let tools: serde_json::Map<String, Value> = statuses
            .into_iter()
            .map(|(name, status)| {
                (
                    name,
                    json!({
                        "available": status.available,
                        "type": status.kind,
                        "status": status.state
                    }),
                )
            })
            .collect();

        let message = if available {
            "All tools are available for on-demand execution"
        } else {
            "Sandbox unavailable; tools are offline"
        };

        json!({
            "success": true,
            "total_tools": tools.len(),
            "tools": tools,
            "architecture": SANDBOX_KIND,
            "message": message,
            "checked_at": chrono::Utc::now().to_rfc3339()
        })
    }

    pub async fn ping_tool(&self, tool_name: &str) -> Value {
        match self.status(tool_name).await {
            Err(e) => json!({
                "success": false,
                "error": e.to_string()
            }),
            Ok(status) if !status.available => json!({
                "success": false,
                "tool": tool_name,
                "status": "offline",
                "error": ToolError::SandboxUnavailable.to_string()
            }),
            Ok(status) => json!({
                "success": true,
                "tool": tool_name,
                "status": "online",
                "type": status.kind,
                "message": "Tool available for on-demand execution"
            }),
        }
    }
}
