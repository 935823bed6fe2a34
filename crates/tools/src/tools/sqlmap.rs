use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, Mount, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, Tool};

pub const DEFAULT_IMAGE: &str = "googlesky/sqlmap:latest";
const OUTPUT_DIR: &str = "/app/output";
const MAX_RISK: u8 = 3;
const MAX_LEVEL: u8 = 5;

fn default_one() -> u8 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SqlmapInput {
    url: String,
    #[serde(default = "default_one")]
    risk: u8,
    #[serde(default = "default_one")]
    level: u8,
}

/// SQL injection probe. Session files land in `<data_dir>/sqlmap/output`.
pub struct SqlmapTool {
    profile: ToolProfile,
}

impl SqlmapTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for SqlmapTool {
    fn name(&self) -> &'static str {
        "sqlmap"
    }

    fn description(&self) -> &'static str {
        "SQL injection detection with sqlmap (batch mode)"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string"},
                "risk": {"type": "integer", "minimum": 1, "maximum": MAX_RISK, "default": 1},
                "level": {"type": "integer", "minimum": 1, "maximum": MAX_LEVEL, "default": 1}
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
        let input: SqlmapInput = parse_input(self.name(), input)?;
        let url = ArgumentGuard::target("url", &input.url)?;

        if !(1..=MAX_RISK).contains(&input.risk) {
            return Err(ToolError::validation(format!("risk must be between 1 and {MAX_RISK}")));
        }
        if !(1..=MAX_LEVEL).contains(&input.level) {
            return Err(ToolError::validation(format!("level must be between 1 and {MAX_LEVEL}")));
        }

        let spec = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .mount(Mount::read_write(self.profile.data_path("sqlmap", "output"), OUTPUT_DIR))
            .args(["python", "sqlmap-dev/sqlmap.py", "-u", url.as_str(), "--batch"])
            .arg(format!("--output-dir={OUTPUT_DIR}"))
            .arg(format!("--risk={}", input.risk))
            .arg(format!("--level={}", input.level))
            .build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        Ok(json!({
            "url": url,
            "risk": input.risk,
            "level": input.level,
            "output": stdout
        }))
    }
}
