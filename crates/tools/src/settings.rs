use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DOCKER_BIN: &str = "docker";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;

/// How the gateway reaches the container runtime and where shared
/// wordlist/output directories live on the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxSettings {
    pub docker_bin: String,
    pub data_dir: PathBuf,
    pub probe_timeout_secs: u64,
    pub default_timeout_secs: u64,
    pub tools: HashMap<String, ToolOverride>,
}

/// Per-tool overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolOverride {
    pub image: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            docker_bin: DEFAULT_DOCKER_BIN.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            default_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            tools: HashMap::new(),
        }
    }
}

impl SandboxSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Resolve the image and time bound for one adapter.
    ///
    /// Precedence: configured override, then the adapter's own bound,
    /// then `default_timeout_secs`.
    pub fn profile(&self, tool: &str, default_image: &str, builtin_timeout_secs: Option<u64>) -> ToolProfile {
        let overrides = self.tools.get(tool);
        let image = overrides
            .and_then(|o| o.image.clone())
            .unwrap_or_else(|| default_image.to_string());
        let timeout_secs = overrides
            .and_then(|o| o.timeout_secs)
            .or(builtin_timeout_secs)
            .unwrap_or(self.default_timeout_secs);

        ToolProfile {
            image,
            timeout: Duration::from_secs(timeout_secs),
            data_dir: self.data_dir.clone(),
        }
    }
}

/// Resolved per-adapter attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolProfile {
    pub image: String,
    pub timeout: Duration,
    pub data_dir: PathBuf,
}

impl ToolProfile {
    /// Host directory `<data_dir>/<tool>/<kind>`.
    pub fn data_path(&self, tool: &str, kind: &str) -> PathBuf {
        self.data_dir.join(tool).join(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_timeout_beats_default() {
        let settings = SandboxSettings::default();
        let profile = settings.profile("wpscan", "wpscanteam/wpscan:latest", Some(300));
        assert_eq!(profile.timeout, Duration::from_secs(300));
        assert_eq!(profile.image, "wpscanteam/wpscan:latest");
    }

    #[test]
    fn override_beats_builtin() {
        let mut settings = SandboxSettings::default();
        settings.tools.insert(
            "nmap".into(),
            ToolOverride {
                image: Some("registry.local/nmap:7.94".into()),
                timeout_secs: Some(30),
            },
        );
        let profile = settings.profile("nmap", "instrumentisto/nmap:latest", Some(600));
        assert_eq!(profile.timeout, Duration::from_secs(30));
        assert_eq!(profile.image, "registry.local/nmap:7.94");
    }

    #[test]
    fn data_path_layout() {
        let profile = SandboxSettings::default().profile("ffuf", "trickest/ffuf:latest", None);
        assert_eq!(profile.data_path("ffuf", "wordlists"), PathBuf::from("./data/ffuf/wordlists"));
        assert_eq!(profile.timeout, Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS));
    }
}
