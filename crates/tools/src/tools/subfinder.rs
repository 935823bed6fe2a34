use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, parse_json, parse_json_lines, Tool};

pub const DEFAULT_IMAGE: &str = "projectdiscovery/subfinder:latest";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubfinderInput {
    domain: String,
    #[serde(default)]
    recursive: bool,
}

/// Passive subdomain discovery.
pub struct SubfinderTool {
    profile: ToolProfile,
}

impl SubfinderTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

/// Accepts either a single `{"subdomains": [...]}` document or subfinder's
/// JSON lines (`{"host": ...}` per line).
fn extract_subdomains(tool: &str, stdout: &str) -> Result<Vec<String>, ToolError> {
    if let Ok(Value::Object(doc)) = parse_json(tool, stdout) {
        if let Some(list) = doc.get("subdomains") {
            return serde_json::from_value(list.clone())
                .map_err(|e| ToolError::output_parse(tool, e, stdout));
        }
    }

    let mut hosts = parse_json_lines(tool, stdout)?
        .into_iter()
        .map(|row| {
            row.get("host")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ToolError::output_parse(tool, "line without host field", stdout))
        })
        .collect::<Result<Vec<_>, _>>()?;
    hosts.sort();
    hosts.dedup();
    Ok(hosts)
}

#[async_trait]
impl Tool for SubfinderTool {
    fn name(&self) -> &'static str {
        "subfinder"
    }

    fn description(&self) -> &'static str {
        "Passive subdomain enumeration with subfinder"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "domain": {"type": "string"},
                "recursive": {"type": "boolean", "default": false}
            },
            "required": ["domain"]
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
        let input: SubfinderInput = parse_input(self.name(), input)?;
        let domain = ArgumentGuard::target("domain", &input.domain)?;

        let mut builder = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .args(["subfinder", "-d", domain.as_str(), "-silent", "-oJ"]);
        if input.recursive {
            builder = builder.arg("-recursive");
        }
        let spec = builder.build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        Ok(json!({
            "domain": domain,
            "subdomains": extract_subdomains(self.name(), &stdout)?
        }))
    }
}
