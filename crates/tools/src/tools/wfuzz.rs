use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::ProcessInvoker;
use crate::settings::ToolProfile;
use crate::tools::base::Tool;
use crate::tools::ffuf::{FfufTool, DEFAULT_FILTER_CODE, DEFAULT_WORDLIST};

/// No wfuzz image is shipped; requests run on ffuf and say so.
pub struct WfuzzTool {
    ffuf: FfufTool,
}

impl WfuzzTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self {
            ffuf: FfufTool::new(profile),
        }
    }
}

#[async_trait]
impl Tool for WfuzzTool {
    fn name(&self) -> &'static str {
        "wfuzz"
    }

    fn engine(&self) -> &'static str {
        "ffuf"
    }

    fn description(&self) -> &'static str {
        "Fuzz web endpoints (executed by ffuf); the url must contain the FUZZ marker"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "Target URL containing FUZZ"},
                "wordlist": {"type": "string", "default": DEFAULT_WORDLIST},
                "filter_code": {"type": "string", "default": DEFAULT_FILTER_CODE}
            },
            "required": ["url"]
        })
    }

    fn timeout(&self) -> Duration {
        self.ffuf.timeout()
    }

    async fn execute(
        &self,
        invoker: &dyn ProcessInvoker,
        input: Value,
    ) -> Result<Value, ToolError> {
        let (url, results) = self.ffuf.run(invoker, input, self.name()).await?;
        Ok(json!({
            "tool": self.name(),
            "engine": self.engine(),
            "url": url,
            "results": results
        }))
    }
}
