use std::path::PathBuf;
use std::time::Duration;

/// A bind mount from the host into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: String,
    pub read_only: bool,
}

impl Mount {
    pub fn read_write(host: impl Into<PathBuf>, container: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
            read_only: false,
        }
    }

    pub fn read_only(host: impl Into<PathBuf>, container: impl Into<String>) -> Self {
        Self {
            read_only: true,
            ..Self::read_write(host, container)
        }
    }

    fn volume_arg(&self) -> String {
        let mut arg = format!("{}:{}", self.host.display(), self.container);
        if self.read_only {
            arg.push_str(":ro");
        }
        arg
    }
}

/// One sandboxed invocation: image, argument vector, mounts, devices and
/// the wall-clock bound. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    image: String,
    args: Vec<String>,
    mounts: Vec<Mount>,
    devices: Vec<String>,
    timeout: Duration,
}

impl CommandSpec {
    pub fn builder(image: impl Into<String>, timeout: Duration) -> CommandSpecBuilder {
        CommandSpecBuilder {
            spec: CommandSpec {
                image: image.into(),
                args: Vec::new(),
                mounts: Vec::new(),
                devices: Vec::new(),
                timeout,
            },
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Value following `flag` in the argument vector.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|idx| self.args.get(idx + 1))
            .map(String::as_str)
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Arguments for `docker run` with a named, self-removing container.
    pub fn docker_run_args(&self, container_name: &str) -> Vec<String> {
        let mut out = vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            container_name.to_string(),
        ];

        for mount in &self.mounts {
            out.push("-v".to_string());
            out.push(mount.volume_arg());
        }

        for device in &self.devices {
            out.push(format!("--device={device}"));
        }

        out.push(self.image.clone());
        out.extend(self.args.iter().cloned());
        out
    }
}

pub struct CommandSpecBuilder {
    spec: CommandSpec,
}

impl CommandSpecBuilder {
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.spec.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `flag value` when `value` is present.
    pub fn opt_flag(self, flag: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.arg(flag).arg(value),
            None => self,
        }
    }

    pub fn mount(mut self, mount: Mount) -> Self {
        self.spec.mounts.push(mount);
        self
    }

    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.spec.devices.push(device.into());
        self
    }

    pub fn build(self) -> CommandSpec {
        self.spec
    }
}
