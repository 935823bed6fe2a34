#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use secops_tools::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every spec and answers with a canned result.
pub struct SpyInvoker {
    calls: Mutex<Vec<CommandSpec>>,
    response: ProcessResult,
}

impl SpyInvoker {
    pub fn new(response: ProcessResult) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response,
        })
    }

    pub fn with_stdout(stdout: &str) -> Arc<Self> {
        Self::new(ProcessResult {
            exit_status: Some(0),
            stdout: stdout.to_string(),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> CommandSpec {
        self.calls().pop().expect("no invocation recorded")
    }
}

#[async_trait]
impl ProcessInvoker for SpyInvoker {
    async fn invoke(&self, spec: &CommandSpec) -> Result<ProcessResult, ToolError> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok(self.response.clone())
    }
}

/// Fails the way a missing docker binary does.
pub struct MissingBinaryInvoker;

#[async_trait]
impl ProcessInvoker for MissingBinaryInvoker {
    async fn invoke(&self, _spec: &CommandSpec) -> Result<ProcessResult, ToolError> {
        Err(ToolError::Invocation("docker: No such file or directory".into()))
    }
}

/// Fixed availability answer that counts how often it was asked.
pub struct StaticProbe {
    available: bool,
    checks: AtomicUsize,
}

impl StaticProbe {
    pub fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available,
            checks: AtomicUsize::new(0),
        })
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SandboxProbe for StaticProbe {
    async fn is_available(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.available
    }
}

pub fn build_gateway(probe: Arc<StaticProbe>, invoker: Arc<dyn ProcessInvoker>) -> ToolGateway {
    let registry = Arc::new(ToolRegistryImpl::with_catalog(&SandboxSettings::default()));
    ToolGateway::new(registry, probe, invoker)
}
