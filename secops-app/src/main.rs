use anyhow::Result;
use secops_app::cli::{parse_args, USAGE};
use secops_app::config::Config;
use secops_app::logging;
use secops_app::server::{McpServer, SERVER_NAME};
use secops_tools::{DockerInvoker, DockerProbe, SandboxProbe, ToolGateway, ToolRegistryImpl};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    if args.version {
        println!("{SERVER_NAME} {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    logging::init(&config.logging)?;

    let settings = &config.sandbox;
    info!(
        docker = %settings.docker_bin,
        data_dir = %settings.data_dir.display(),
        "Starting {SERVER_NAME} {}",
        env!("CARGO_PKG_VERSION")
    );

    let probe = Arc::new(DockerProbe::new(settings.docker_bin.clone(), settings.probe_timeout()));
    if probe.is_available().await {
        info!("Docker is available");
    } else {
        // Keep serving so status queries can report the outage.
        warn!("Docker is not available, every tool will report offline");
    }

    let registry = Arc::new(ToolRegistryImpl::with_catalog(settings));
    info!(tools = registry.count(), "Tool registry built");

    let invoker = Arc::new(DockerInvoker::new(settings.docker_bin.clone()));
    let gateway = Arc::new(ToolGateway::new(registry, probe, invoker));

    Arc::new(McpServer::new(gateway))
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await
}
