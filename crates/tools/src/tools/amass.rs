use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{default_true, non_empty_lines, parse_input, Tool};

pub const DEFAULT_IMAGE: &str = "caffix/amass:latest";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AmassInput {
    domain: String,
    #[serde(default = "default_true")]
    passive: bool,
}

/// Asset discovery. Passive by default: third-party sources only.
pub struct AmassTool {
    profile: ToolProfile,
}

impl AmassTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for AmassTool {
    fn name(&self) -> &'static str {
        "amass"
    }

    fn description(&self) -> &'static str {
        "Subdomain and asset enumeration with amass"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "domain": {"type": "string"},
                "passive": {"type": "boolean", "default": true}
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
        let input: AmassInput = parse_input(self.name(), input)?;
        let domain = ArgumentGuard::target("domain", &input.domain)?;

        let mut builder = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .args(["amass", "enum"]);
        if input.passive {
            builder = builder.arg("-passive");
        }
        let spec = builder.args(["-d", domain.as_str()]).build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        let mut subdomains = non_empty_lines(&stdout);
        subdomains.sort();
        subdomains.dedup();

        Ok(json!({
            "domain": domain,
            "passive": input.passive,
            "subdomains": subdomains
        }))
    }
}
