use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, parse_json, Tool};

pub const DEFAULT_IMAGE: &str = "wpscanteam/wpscan:latest";
/// Full enumeration of a WordPress site is slow; bound it explicitly.
pub const TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum WpscanFormat {
    #[default]
    Json,
    Cli,
    CliNoColor,
}

impl WpscanFormat {
    fn as_arg(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Cli => "cli",
            Self::CliNoColor => "cli-no-color",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WpscanInput {
    target: String,
    #[serde(default)]
    api_token: Option<String>,
    #[serde(default)]
    output_format: WpscanFormat,
}

pub struct WpscanTool {
    profile: ToolProfile,
}

impl WpscanTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for WpscanTool {
    fn name(&self) -> &'static str {
        "wpscan"
    }

    fn description(&self) -> &'static str {
        "WordPress vulnerability scan enumerating plugins, themes and users"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "target": {"type": "string", "description": "WordPress site URL"},
                "api_token": {"type": "string", "description": "WPScan API token for vulnerability data"},
                "output_format": {"type": "string", "enum": ["json", "cli", "cli-no-color"], "default": "json"}
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
        let input: WpscanInput = parse_input(self.name(), input)?;
        let target = ArgumentGuard::target("target", &input.target)?;
        let api_token = input
            .api_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| ArgumentGuard::option("api_token", t))
            .transpose()?;

        let spec = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .args(["wpscan", "--url", target.as_str()])
            .args(["--format", input.output_format.as_arg()])
            .args(["--enumerate", "p", "--enumerate", "t", "--enumerate", "u", "--verbose"])
            .opt_flag("--api-token", api_token)
            .build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        let report = match input.output_format {
            WpscanFormat::Json => parse_json(self.name(), &stdout)?,
            WpscanFormat::Cli | WpscanFormat::CliNoColor => Value::String(stdout),
        };

        Ok(json!({
            "target": target,
            "report": report
        }))
    }
}
