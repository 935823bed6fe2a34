use anyhow::{bail, Context, Result};
use secops_tools::{SandboxSettings, CATALOG};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "secops.yaml";
pub const CONFIG_ENV: &str = "SECOPS_CONFIG";
pub const DOCKER_BIN_ENV: &str = "SECOPS_DOCKER_BIN";
pub const DATA_DIR_ENV: &str = "SECOPS_DATA_DIR";

/// Tools that can be configured without appearing in the status catalog.
const ALIASES: &[&str] = &["wfuzz"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sandbox: SandboxSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Used when neither `SECOPS_LOG` nor `RUST_LOG` is set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or from `secops.yaml` when it exists, or defaults.
    /// Environment overrides are applied before validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bin) = lookup(DOCKER_BIN_ENV).filter(|v| !v.trim().is_empty()) {
            self.sandbox.docker_bin = bin;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.sandbox.data_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let sandbox = &self.sandbox;

        if sandbox.docker_bin.trim().is_empty() {
            bail!("sandbox.docker_bin must not be empty");
        }
        if sandbox.probe_timeout_secs == 0 {
            bail!("sandbox.probe_timeout_secs must be greater than zero");
        }
        if sandbox.default_timeout_secs == 0 {
            bail!("sandbox.default_timeout_secs must be greater than zero");
        }

        for (name, tool) in &sandbox.tools {
            if !CATALOG.contains(&name.as_str()) && !ALIASES.contains(&name.as_str()) {
                bail!("sandbox.tools.{name}: unknown tool");
            }
            if tool.timeout_secs == Some(0) {
                bail!("sandbox.tools.{name}.timeout_secs must be greater than zero");
            }
            if tool.image.as_deref().is_some_and(|i| i.trim().is_empty()) {
                bail!("sandbox.tools.{name}.image must not be empty");
            }
        }

        Ok(())
    }
}
