//! The single response shape that crosses the gateway boundary.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timed_out: Option<bool>,
}

impl ResultEnvelope {
    pub fn ok(results: Value) -> Self {
        Self {
            success: true,
            results: Some(results),
            error: None,
            stderr: None,
            return_code: None,
            raw_output: None,
            timed_out: None,
        }
    }

    pub fn failure(err: &ToolError) -> Self {
        let mut envelope = Self {
            success: false,
            results: None,
            error: Some(err.to_string()),
            stderr: None,
            return_code: None,
            raw_output: None,
            timed_out: None,
        };

        match err {
            ToolError::ExecutionFailed { status, stderr, .. } => {
                envelope.stderr = Some(stderr.clone());
                envelope.return_code = *status;
            }
            ToolError::Timeout { stderr, .. } => {
                envelope.stderr = Some(stderr.clone()).filter(|s| !s.is_empty());
                envelope.timed_out = Some(true);
            }
            ToolError::OutputParse { raw_output, .. } => {
                envelope.raw_output = Some(raw_output.clone());
            }
            _ => {}
        }

        envelope
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"error":"Failed to encode result: {e}"}}"#)
        })
    }
}

/// Collapse the outcome of any layer into an envelope.
pub fn normalize(outcome: Result<Value, ToolError>) -> ResultEnvelope {
    match outcome {
        Ok(results) => ResultEnvelope::ok(results),
        Err(err) => ResultEnvelope::failure(&err),
    }
}
