use secops_app::config::{Config, LogFormat};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

const SAMPLE: &str = r#"
sandbox:
  docker_bin: podman
  data_dir: /srv/secops
  probe_timeout_secs: 5
  tools:
    wpscan:
      timeout_secs: 600
    nuclei:
      image: registry.local/nuclei:3
logging:
  format: json
  filter: secops_tools=debug
"#;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.sandbox.docker_bin, "docker");
    assert_eq!(config.sandbox.data_dir, PathBuf::from("./data"));
    assert_eq!(config.sandbox.probe_timeout_secs, 10);
    assert_eq!(config.sandbox.default_timeout_secs, 300);
    assert_eq!(config.logging.format, LogFormat::Text);
    assert_eq!(config.logging.filter, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_yaml() {
    let config = Config::from_yaml(SAMPLE).unwrap();
    assert_eq!(config.sandbox.docker_bin, "podman");
    assert_eq!(config.sandbox.probe_timeout(), Duration::from_secs(5));
    // Unset keys keep their defaults.
    assert_eq!(config.sandbox.default_timeout_secs, 300);
    assert_eq!(config.logging.format, LogFormat::Json);
    config.validate().unwrap();

    let wpscan = config.sandbox.profile("wpscan", "wpscanteam/wpscan", Some(300));
    assert_eq!(wpscan.timeout, Duration::from_secs(600));

    let nuclei = config.sandbox.profile("nuclei", "projectdiscovery/nuclei", None);
    assert_eq!(nuclei.image, "registry.local/nuclei:3");
    assert_eq!(nuclei.timeout, Duration::from_secs(300));
}

#[test]
fn test_empty_file_is_default() {
    assert_eq!(Config::from_yaml("   \n").unwrap(), Config::default());
}

#[test]
fn test_unknown_keys_rejected() {
    assert!(Config::from_yaml("sandbox:\n  docker: podman\n").is_err());
    assert!(Config::from_yaml("server:\n  port: 80\n").is_err());
    assert!(Config::from_yaml("logging:\n  format: xml\n").is_err());
}

#[test]
fn test_validation() {
    let mut config = Config::default();
    config.sandbox.docker_bin = "  ".into();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.sandbox.default_timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.sandbox.probe_timeout_secs = 0;
    assert!(config.validate().is_err());

    let config = Config::from_yaml("sandbox:\n  tools:\n    metasploit: {}\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("metasploit"));

    let config = Config::from_yaml("sandbox:\n  tools:\n    nmap: { timeout_secs: 0 }\n").unwrap();
    assert!(config.validate().is_err());

    let config = Config::from_yaml("sandbox:\n  tools:\n    ffuf: { image: '' }\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_alias_override_allowed() {
    let config = Config::from_yaml("sandbox:\n  tools:\n    wfuzz: { timeout_secs: 60 }\n").unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = [
        ("SECOPS_DOCKER_BIN", "/usr/local/bin/docker"),
        ("SECOPS_DATA_DIR", "/var/lib/secops"),
    ]
    .into_iter()
    .collect();

    let mut config = Config::default();
    config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
    assert_eq!(config.sandbox.docker_bin, "/usr/local/bin/docker");
    assert_eq!(config.sandbox.data_dir, Path::new("/var/lib/secops"));
}

#[test]
fn test_blank_env_ignored() {
    let mut config = Config::default();
    config.apply_overrides(|_| Some(String::new()));
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_explicit_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"sandbox:\n  default_timeout_secs: 42\n").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.sandbox.default_timeout_secs, 42);
}

#[test]
fn test_load_missing_explicit_file() {
    let err = Config::load(Some(Path::new("/nonexistent/secops.yaml"))).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/secops.yaml"));
}

#[test]
fn test_load_invalid_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"sandbox:\n  probe_timeout_secs: 0\n").unwrap();
    assert!(Config::load(Some(file.path())).is_err());
}
