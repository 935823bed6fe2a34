use anyhow::{bail, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: secops-mcp [--config <path>]

Serves the security tool gateway over stdio (JSON-RPC 2.0, one message per line).

Options:
  -c, --config <path>  YAML configuration file (default: secops.yaml if present)
  -h, --help           Print this help
  -V, --version        Print version";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub help: bool,
    pub version: bool,
}

pub fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => parsed.config = Some(PathBuf::from(path)),
                None => bail!("{arg} requires a path"),
            },
            "-h" | "--help" => parsed.help = true,
            "-V" | "--version" => parsed.version = true,
            other => match other.strip_prefix("--config=") {
                Some(path) => parsed.config = Some(PathBuf::from(path)),
                None => bail!("Unknown argument: {other}\n\n{USAGE}"),
            },
        }
    }

    Ok(parsed)
}
