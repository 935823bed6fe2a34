use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, parse_json_lines, Tool};

pub const DEFAULT_IMAGE: &str = crate::tools::nuclei::DEFAULT_IMAGE;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XsstrikeInput {
    url: String,
    #[serde(default)]
    crawl: bool,
}

/// Cross-site scripting scan. No XSStrike image is shipped, so this runs
/// nuclei restricted to its `xss` templates.
pub struct XsstrikeTool {
    profile: ToolProfile,
}

impl XsstrikeTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for XsstrikeTool {
    fn name(&self) -> &'static str {
        "xsstrike"
    }

    fn engine(&self) -> &'static str {
        "nuclei"
    }

    fn description(&self) -> &'static str {
        "Cross-site scripting scan (executed by nuclei xss templates)"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string"},
                "crawl": {"type": "boolean", "default": false}
            },
            "required": ["url"]
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
        let input: XsstrikeInput = parse_input(self.name(), input)?;
        let url = ArgumentGuard::target("url", &input.url)?;

        let spec = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .args(["nuclei", "-u", url.as_str(), "-tags", "xss", "-jsonl", "-silent"])
            .build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        // nuclei has no crawler; the flag is echoed so callers can tell.
        Ok(json!({
            "tool": self.name(),
            "engine": self.engine(),
            "url": url,
            "crawl": input.crawl,
            "findings": parse_json_lines(self.name(), &stdout)?
        }))
    }
}
