use crate::error::ToolError;
use crate::sandbox::ProcessInvoker;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// A scanner exposed through the gateway.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    /// Binary that actually runs. Differs from `name` for substitutes.
    fn engine(&self) -> &'static str {
        self.name()
    }

    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    fn timeout(&self) -> Duration;

    async fn execute(
        &self,
        invoker: &dyn ProcessInvoker,
        input: Value,
    ) -> Result<Value, ToolError>;
}

/// Decode the caller's arguments into the adapter's request type.
pub fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, ToolError> {
    let input = if input.is_null() {
        Value::Object(Default::default())
    } else {
        input
    };
    serde_json::from_value(input)
        .map_err(|e| ToolError::validation(format!("invalid {tool} arguments: {e}")))
}

pub fn parse_json(tool: &str, stdout: &str) -> Result<Value, ToolError> {
    serde_json::from_str(stdout.trim()).map_err(|e| ToolError::output_parse(tool, e, stdout))
}

/// One JSON document per non-empty line. Empty output is an empty list.
pub fn parse_json_lines(tool: &str, stdout: &str) -> Result<Vec<Value>, ToolError> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(|e| ToolError::output_parse(tool, e, stdout)))
        .collect()
}

pub fn non_empty_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn default_true() -> bool {
    true
}
