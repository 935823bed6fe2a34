use crate::error::ToolError;
use crate::sandbox::command::CommandSpec;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const CLEANUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Captured outcome of one process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_status == Some(0)
    }

    /// Stdout of a clean exit, or the matching failure.
    pub fn into_stdout(self, tool: &str, limit: Duration) -> Result<String, ToolError> {
        self.into_stdout_allowing(tool, limit, &[0])
    }

    /// Like [`into_stdout`](Self::into_stdout) for tools that use more than
    /// one exit code to report a completed run.
    pub fn into_stdout_allowing(
        self,
        tool: &str,
        limit: Duration,
        ok_codes: &[i32],
    ) -> Result<String, ToolError> {
        if self.timed_out {
            return Err(ToolError::Timeout {
                tool: tool.to_string(),
                seconds: limit.as_secs(),
                stderr: self.stderr,
            });
        }

        match self.exit_status {
            Some(code) if ok_codes.contains(&code) => Ok(self.stdout),
            status => Err(ToolError::ExecutionFailed {
                tool: tool.to_string(),
                status,
                stderr: self.stderr,
            }),
        }
    }
}

/// Runs one [`CommandSpec`] to completion.
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn invoke(&self, spec: &CommandSpec) -> Result<ProcessResult, ToolError>;
}

/// Executes specs as `docker run --rm` containers.
pub struct DockerInvoker {
    docker_bin: String,
}

impl DockerInvoker {
    pub fn new(docker_bin: impl Into<String>) -> Self {
        Self {
            docker_bin: docker_bin.into(),
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.docker_bin);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // New session so the whole group can be torn down at once
        #[cfg(unix)]
        {
            unsafe {
                cmd.pre_exec(|| {
                    libc::setsid();
                    Ok(())
                });
            }
        }

        cmd
    }

    /// Force-remove a container left behind by a killed client. Runs in the
    /// background so a slow daemon cannot hold the caller past its bound.
    fn remove_container(&self, name: String) {
        let mut cmd = Command::new(&self.docker_bin);
        cmd.args(["rm", "-f", name.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        tokio::spawn(async move {
            match timeout(CLEANUP_TIMEOUT, cmd.status()).await {
                Ok(Ok(status)) if status.success() => debug!(container = %name, "Container removed"),
                Ok(Ok(status)) => debug!(container = %name, ?status, "Container already gone"),
                Ok(Err(e)) => warn!(container = %name, "Container cleanup failed: {}", e),
                Err(_) => warn!(container = %name, "Container cleanup timed out"),
            }
        });
    }
}

#[async_trait]
impl ProcessInvoker for DockerInvoker {
    async fn invoke(&self, spec: &CommandSpec) -> Result<ProcessResult, ToolError> {
        let container = format!("secops-{}", uuid::Uuid::new_v4());
        let args = absolutize_mounts(spec.docker_run_args(&container));
        debug!(program = %self.docker_bin, ?args, "Launching sandbox");

        let mut child = self
            .command(&args)
            .spawn()
            .map_err(|e| ToolError::Invocation(format!("{}: {}", self.docker_bin, e)))?;

        let stdout = tokio::spawn(read_stream(child.stdout.take()));
        let stderr = tokio::spawn(read_stream(child.stderr.take()));

        let pgid = child.id();
        let waited = timeout(spec.timeout(), child.wait()).await;

        let (exit_status, timed_out) = match waited {
            Ok(Ok(status)) => (status.code(), false),
            Ok(Err(e)) => {
                stdout.abort();
                stderr.abort();
                return Err(ToolError::Invocation(e.to_string()));
            }
            Err(_) => {
                warn!(
                    container = %container,
                    "Sandbox exceeded {}s, killing",
                    spec.timeout().as_secs()
                );
                // The client is still unreaped here, so its pid cannot
                // have been recycled into another group.
                kill_process_group(pgid);
                let _ = child.start_kill();
                let _ = child.wait().await;
                self.remove_container(container);
                (None, true)
            }
        };

        Ok(ProcessResult {
            exit_status,
            stdout: drain(stdout).await,
            stderr: drain(stderr).await,
            timed_out,
        })
    }
}

/// Bind mounts need absolute host paths.
fn absolutize_mounts(mut args: Vec<String>) -> Vec<String> {
    let Ok(cwd) = std::env::current_dir() else {
        return args;
    };

    for idx in 1..args.len() {
        if args[idx - 1] != "-v" {
            continue;
        }
        if let Some((host, rest)) = args[idx].split_once(':') {
            if !Path::new(host).is_absolute() {
                let absolute = cwd.join(host.trim_start_matches("./"));
                args[idx] = format!("{}:{}", absolute.display(), rest);
            }
        }
    }

    args
}

fn kill_process_group(pgid: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pgid) = pgid {
            unsafe {
                libc::killpg(pgid as libc::pid_t, libc::SIGKILL);
            }
        }
    }
    #[cfg(not(unix))]
    let _ = pgid;
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let Some(mut stream) = stream else {
        return String::new();
    };
    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).to_string()
}

async fn drain(mut handle: JoinHandle<String>) -> String {
    match timeout(DRAIN_TIMEOUT, &mut handle).await {
        Ok(Ok(text)) => text,
        _ => {
            handle.abort();
            String::new()
        }
    }
}
