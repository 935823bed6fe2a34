use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, Mount, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, parse_json, Tool};

pub const DEFAULT_IMAGE: &str = "maurosoria/dirsearch:latest";
const WORDLIST_DIR: &str = "/app/wordlists";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirsearchInput {
    url: String,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    wordlist: Option<String>,
}

/// Content discovery. Without a wordlist the image's bundled list is used.
pub struct DirsearchTool {
    profile: ToolProfile,
}

impl DirsearchTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for DirsearchTool {
    fn name(&self) -> &'static str {
        "dirsearch"
    }

    fn description(&self) -> &'static str {
        "Web path brute-forcing with dirsearch"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string"},
                "extensions": {"type": "array", "items": {"type": "string"}, "description": "e.g. [\"php\", \"bak\"]"},
                "wordlist": {"type": "string", "description": "File name under the dirsearch wordlists directory"}
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
        let input: DirsearchInput = parse_input(self.name(), input)?;
        let url = ArgumentGuard::target("url", &input.url)?;

        let extensions = input
            .extensions
            .iter()
            .map(|e| ArgumentGuard::option("extensions", e.trim_start_matches('.')))
            .collect::<Result<Vec<_>, _>>()?;
        let wordlist = input
            .wordlist
            .as_deref()
            .filter(|w| !w.trim().is_empty())
            .map(|w| ArgumentGuard::file_name("wordlist", w))
            .transpose()?;

        let mut builder = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .args(["dirsearch", "-u", url.as_str(), "--format=json", "-o", "/dev/stdout", "-q"])
            .opt_flag("-e", (!extensions.is_empty()).then(|| extensions.join(",")));
        if let Some(name) = &wordlist {
            builder = builder
                .mount(Mount::read_only(
                    self.profile.data_path("dirsearch", "wordlists"),
                    WORDLIST_DIR,
                ))
                .arg("-w")
                .arg(format!("{WORDLIST_DIR}/{name}"));
        }
        let spec = builder.build();

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(self.name(), spec.timeout())?;

        Ok(json!({
            "url": url,
            "extensions": extensions,
            "wordlist": wordlist,
            "results": parse_json(self.name(), &stdout)?
        }))
    }
}
