use thiserror::Error;

/// Every failure the gateway can report. All variants end up as data in a
/// [`ResultEnvelope`](crate::envelope::ResultEnvelope); none are fatal.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Docker no está disponible en el sistema")]
    SandboxUnavailable,

    #[error("Herramienta {0} no encontrada")]
    UnknownTool(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to start process: {0}")]
    Invocation(String),

    #[error("{tool} execution failed with exit status {}", display_status(.status))]
    ExecutionFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{tool} scan timed out after {seconds} seconds")]
    Timeout {
        tool: String,
        seconds: u64,
        stderr: String,
    },

    #[error("Failed to parse {tool} output: {reason}")]
    OutputParse {
        tool: String,
        reason: String,
        raw_output: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn display_status(status: &Option<i32>) -> String {
    status.map_or_else(|| "unknown".to_string(), |code| code.to_string())
}

impl ToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn output_parse(tool: &str, reason: impl ToString, raw_output: &str) -> Self {
        Self::OutputParse {
            tool: tool.to_string(),
            reason: reason.to_string(),
            raw_output: raw_output.to_string(),
        }
    }
}
