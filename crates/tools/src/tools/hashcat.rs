use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use crate::error::ToolError;
use crate::sandbox::{ArgumentGuard, CommandSpec, Mount, ProcessInvoker};
use crate::settings::ToolProfile;
use crate::tools::base::{non_empty_lines, parse_input, Tool};

pub const DEFAULT_IMAGE: &str = "javydekoning/hashcat:latest";
const WORDLIST_DIR: &str = "/app/wordlists";
const HASH_DIR: &str = "/app/hashes";
const GPU_DEVICE: &str = "/dev/dri";
/// hashcat exits 1 when the wordlist is exhausted without cracking everything.
const EXHAUSTED: i32 = 1;

/// Hash mode given either as a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HashMode {
    Number(u32),
    Text(String),
}

impl Default for HashMode {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl HashMode {
    fn resolve(&self) -> Result<u32, ToolError> {
        match self {
            Self::Number(mode) => Ok(*mode),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                ToolError::validation(format!("hash_type must be a numeric hashcat mode: {text}"))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HashcatInput {
    hash_file: String,
    wordlist: String,
    #[serde(default)]
    hash_type: HashMode,
}

/// Dictionary attack. Hashes and wordlists are read from
/// `<data_dir>/hashcat/{hashes,wordlists}`.
pub struct HashcatTool {
    profile: ToolProfile,
}

impl HashcatTool {
    pub fn new(profile: ToolProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Tool for HashcatTool {
    fn name(&self) -> &'static str {
        "hashcat"
    }

    fn description(&self) -> &'static str {
        "Dictionary attack against a hash file with hashcat"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "hash_file": {"type": "string", "description": "File name under the hashes directory"},
                "wordlist": {"type": "string", "description": "File name under the wordlists directory"},
                "hash_type": {"type": ["integer", "string"], "default": 0, "description": "hashcat -m mode, e.g. 0 (MD5), 1000 (NTLM)"}
            },
            "required": ["hash_file", "wordlist"]
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
        let input: HashcatInput = parse_input(self.name(), input)?;
        let hash_file = ArgumentGuard::file_name("hash_file", &input.hash_file)?;
        let wordlist = ArgumentGuard::file_name("wordlist", &input.wordlist)?;
        let mode = input.hash_type.resolve()?;

        let spec = CommandSpec::builder(&self.profile.image, self.profile.timeout)
            .mount(Mount::read_only(self.profile.data_path("hashcat", "wordlists"), WORDLIST_DIR))
            .mount(Mount::read_only(self.profile.data_path("hashcat", "hashes"), HASH_DIR))
            .device(GPU_DEVICE)
            .args(["hashcat", "-m"])
            .arg(mode.to_string())
            .args(["--potfile-disable", "--outfile-format=2", "--quiet"])
            .arg(format!("{HASH_DIR}/{hash_file}"))
            .arg(format!("{WORDLIST_DIR}/{wordlist}"))
            .build();

        let result = invoker.invoke(&spec).await?;
        let exhausted = result.exit_status == Some(EXHAUSTED);
        let stdout = result.into_stdout_allowing(self.name(), spec.timeout(), &[0, EXHAUSTED])?;

        Ok(json!({
            "hash_file": hash_file,
            "mode": mode,
            "exhausted": exhausted,
            "cracked_hashes": non_empty_lines(&stdout),
            "output": stdout
        }))
    }
}
