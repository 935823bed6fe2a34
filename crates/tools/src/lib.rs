pub mod envelope;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod sandbox;
pub mod settings;
pub mod status;
pub mod tools;

pub use envelope::{normalize, ResultEnvelope};
pub use error::ToolError;
pub use gateway::ToolGateway;
pub use registry::{ToolRegistryImpl, CATALOG};
pub use sandbox::{CommandSpec, DockerInvoker, DockerProbe, ProcessInvoker, ProcessResult, SandboxProbe};
pub use settings::{SandboxSettings, ToolOverride, ToolProfile};
pub use status::{ToolState, ToolStatus};
pub use tools::Tool;
