use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, Tool};

pub const DEFAULT_IMAGE: &str = "instrumentisto/nmap:latest";
pub const DEFAULT_SCAN_TYPE: &str = "sV";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NmapInput {
    target: String,
    #[serde(default)]
    ports: Option<String>,
    #[serde(default)]
    scan_type: Option<String>,
}

/// Port scan. Output is nmap's XML report, returned verbatim.
pub struct NmapTool {
    profile: ToolProfile,
}

impl NmapTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for NmapTool {
    fn name(&self) -> &'static str {
        "nmap"
    }

    fn description(&self) -> &'static str {
        "Network port and service scan with nmap"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "target": {"type": "string", "description": "Host, IP or CIDR"},
                "ports": {"type": "string", "description": "Port spec, e.g. 22,80,8000-8100"},
                "scan_type": {"type": "string", "default": DEFAULT_SCAN_TYPE, "description": "Scan flag without the dash, e.g. sV, sS, sT"}
            },
            "required": ["target"]
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
        let input: NmapInput = parse_input(self.name(), input)?;
        let target = ArgumentGuard::target("target", &input.target)?;
        let scan_type = match input.scan_type.as_deref() {
            Some(flag) if !flag.trim().is_empty() => ArgumentGuard::option("scan_type", flag)?,
            _ => DEFAULT_SCAN_TYPE.to_string(),
        };
        let ports = input
            .ports
            .as_deref()
            .map(|p| ArgumentGuard::option("ports", p))
            .transpose()?;

        let spec = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .arg("nmap")
            .arg(format!("-{scan_type}"))
            .opt_flag("-p", ports.clone())
            .args(["-oX", "-", target.as_str()])
            .build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        Ok(json!({
            "target": target,
            "scan_type": scan_type,
            "ports": ports,
            "output": stdout
        }))
    }
}
