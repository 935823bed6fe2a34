use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, parse_json_lines, Tool};

pub const DEFAULT_IMAGE: &str = "projectdiscovery/tlsx:latest";
pub const DEFAULT_PORT: u16 = 443;

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TlsxInput {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

pub struct TlsxTool {
    profile: ToolProfile,
}

impl TlsxTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for TlsxTool {
    fn name(&self) -> &'static str {
        "tlsx"
    }

    fn description(&self) -> &'static str {
        "TLS certificate and configuration grab with tlsx"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "host": {"type": "string"},
                "port": {"type": "integer", "minimum": 1, "maximum": 65535, "default": DEFAULT_PORT}
            },
            "required": ["host"]
        })
    }

    fn timeout(&self) -> Duration {
        self.profile.timeout
    }

    async fn execute(
        &self,
        invoker: &dyn ProcessInvoker,
        input: Value,
    ) -> Result<Value, ToolError> {
        let input: TlsxInput = parse_input(self.name(), input)?;
        let host = ArgumentGuard::target("host", &input.host)?;
        if input.port == 0 {
            return Err(ToolError::validation("port must be between 1 and 65535"));
        }

        let spec = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .args(["tlsx", "-u", host.as_str(), "-p"])
            .arg(input.port.to_string())
            .args(["-json", "-silent"])
            .build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        Ok(json!({
            "host": host,
            "port": input.port,
            "results": parse_json_lines(self.name(), &stdout)?
        }))
    }
}
