use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, Mount, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{parse_input, parse_json, Tool};

pub const DEFAULT_IMAGE: &str = "trickest/ffuf:latest";
pub const DEFAULT_WORDLIST: &str = "directories.txt";
pub const DEFAULT_FILTER_CODE: &str = "404";
const FUZZ_MARKER: &str = "FUZZ";
const WORDLIST_DIR: &str = "/app/wordlists";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FfufInput {
    pub url: String,
    #[serde(default)]
    pub wordlist: Option<String>,
    #[serde(default)]
    pub filter_code: Option<String>,
}

/// Web fuzzer. Wordlists come from `<data_dir>/ffuf/wordlists`.
#[derive(Clone)]
pub struct FfufTool {
    profile: ToolProfile,
}

impl FfufTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }

    pub(crate) fn command(&self, input: &FfufInput) -> Result<(String, CommandSpec), ToolError> {
        let url = ArgumentGuard::target("url", &input.url)?;
        if !url.contains(FUZZ_MARKER) {
            return Err(ToolError::validation(format!(
                "url must contain the {FUZZ_MARKER} marker: {url}"
            )));
        }

        let wordlist = match input.wordlist.as_deref() {
            Some(name) if !name.trim().is_empty() => ArgumentGuard::file_name("wordlist", name)?,
            _ => DEFAULT_WORDLIST.to_string(),
        };
        let filter_code = match input.filter_code.as_deref() {
            Some(code) if !code.trim().is_empty() => ArgumentGuard::option("filter_code", code)?,
            _ => DEFAULT_FILTER_CODE.to_string(),
        };

        let spec = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .mount(Mount::read_only(
                self.profile.data_path("ffuf", "wordlists"),
                WORDLIST_DIR,
            ))
            .args(["ffuf", "-u", url.as_str()])
            .arg("-w")
            .arg(format!("{WORDLIST_DIR}/{wordlist}"))
            .args(["-fc", filter_code.as_str()])
            .args(["-o", "-", "-of", "json", "-s"])
            .build();

        Ok((url, spec))
    }

    pub(crate) async fn run(
        &self,
        invoker: &dyn ProcessInvoker,
        input: Value,
        tool: &str,
    ) -> Result<(String, Value), ToolError> {
        let input: FfufInput = parse_input(tool, input)?;
        let (url, spec) = self.command(&input)?;

        let stdout = invoker
            .invoke(&spec)
            .await?
            .into_stdout(tool, spec.timeout())?;

        Ok((url, parse_json(tool, &stdout)?))
    }
}

#[async_trait]
impl Tool for FfufTool {
    fn name(&self) -> &'static str {
        "ffuf"
    }

    fn description(&self) -> &'static str {
        "Fuzz web endpoints with ffuf; the url must contain the FUZZ marker"
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
        self.profile.timeout
    }

    async fn execute(
        &self,
        invoker: &dyn ProcessInvoker,
        input: Value,
    ) -> Result<Value, ToolError> {
        let (url, results) = self.run(invoker, input, self.name()).await?;
        Ok(json!({
            "url": url,
            "results": results
        }))
    }
}
