use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, parse_json_lines, Tool};

pub const DEFAULT_IMAGE: &str = "projectdiscovery/httpx:latest";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HttpxInput {
    urls: Vec<String>,
    #[serde(default)]
    status_codes: Vec<u16>,
}

/// HTTP probing of a batch of URLs in one container.
pub struct HttpxTool {
    profile: ToolProfile,
}

impl HttpxTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for HttpxTool {
    fn name(&self) -> &'static str {
        "httpx"
    }

    fn description(&self) -> &'static str {
        "Probe URLs for live HTTP services with httpx"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "urls": {"type": "array", "items": {"type": "string"}, "minItems": 1},
                "status_codes": {"type": "array", "items": {"type": "integer"}, "description": "Only report these status codes"}
            },
            "required": ["urls"]
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
        let input: HttpxInput = parse_input(self.name(), input)?;
        if input.urls.is_empty() {
            return Err(ToolError::validation("urls must contain at least one URL"));
        }

        let urls = input
            .urls
            .iter()
            .map(|u| ArgumentGuard::target("urls", u))
            .collect::<Result<Vec<_>, _>>()?;
        if urls.iter().any(|u| u.contains(',')) {
            return Err(ToolError::validation("urls must not contain ','"));
        }

        let match_codes = (!input.status_codes.is_empty()).then(|| {
            input
                .status_codes
                .iter()
                .map(u16::to_string)
                .collect::<Vec<_>>()
                .join(",")
        });

        let spec = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .args(["httpx", "-u"])
            .arg(urls.join(","))
            .args(["-json", "-silent"])
            .opt_flag("-mc", match_codes)
            .build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        Ok(json!({
            "urls": urls,
            "results": parse_json_lines(self.name(), &stdout)?
        }))
    }
}
