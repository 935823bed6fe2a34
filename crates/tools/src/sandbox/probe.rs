use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Answers whether the execution environment can run a job right now.
/// Never errors; any failure is `false`.
#[async_trait]
pub trait SandboxProbe: Send + Sync {
    async fn is_available(&self) -> bool;
}

/// Runs `<docker> --version` under a short bound.
pub struct DockerProbe {
    docker_bin: String,
    timeout: Duration,
}

impl DockerProbe {
    pub fn new(docker_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            docker_bin: docker_bin.into(),
            timeout,
        }
    }
}

#[async_trait]
impl SandboxProbe for DockerProbe {
    async fn is_available(&self) -> bool {
        let mut cmd = Command::new(&self.docker_bin);
        cmd.arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.timeout, cmd.status()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!(program = %self.docker_bin, "Sandbox probe failed to start: {}", e);
                false
            }
            Err(_) => {
                debug!(program = %self.docker_bin, "Sandbox probe timed out");
                false
            }
        }
    }
}
