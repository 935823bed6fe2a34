use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{non_empty_lines, parse_input, parse_json_lines, Tool};

pub const DEFAULT_IMAGE: &str = "projectdiscovery/nuclei:latest";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NucleiInput {
    target: String,
    #[serde(default)]
    templates: Vec<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    output_format: OutputFormat,
}

pub struct NucleiTool {
    profile: ToolProfile,
}

impl NucleiTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }

    fn command(&self, input: &NucleiInput, target: &str) -> Result<CommandSpec, ToolError> {
        let mut builder = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .args(["nuclei", "-u", target, "-silent"]);

        for template in &input.templates {
            builder = builder
                .arg("-t")
                .arg(ArgumentGuard::relative_path("templates", template)?);
        }

        let severity = input
            .severity
            .as_deref()
            .map(|s| ArgumentGuard::option("severity", s))
            .transpose()?;
        builder = builder.opt_flag("-severity", severity);

        if input.output_format == OutputFormat::Json {
            builder = builder.arg("-jsonl");
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl Tool for NucleiTool {
    fn name(&self) -> &'static str {
        "nuclei"
    }

    fn description(&self) -> &'static str {
        "Template-based vulnerability scan with nuclei"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "target": {"type": "string", "description": "URL or host to scan"},
                "templates": {"type": "array", "items": {"type": "string"}},
                "severity": {"type": "string", "description": "Comma separated severities, e.g. critical,high"},
                "output_format": {"type": "string", "enum": ["json", "text"], "default": "json"}
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
        let input: NucleiInput = parse_input(self.name(), input)?;
        let target = ArgumentGuard::target("target", &input.target)?;
        let spec = self.command(&input, &target)?;

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        let findings = match input.output_format {
            OutputFormat::Json => Value::from(parse_json_lines(self.name(), &stdout)?),
            OutputFormat::Text => Value::from(non_empty_lines(&stdout)),
        };

        Ok(json!({
            "target": target,
            "findings": findings
        }))
    }
}
