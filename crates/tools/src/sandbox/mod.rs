pub mod command;
pub mod guard;
pub mod invoker;
pub mod probe;

pub use command::{CommandSpec, CommandSpecBuilder, Mount};
pub use guard::ArgumentGuard;
pub use invoker::{DockerInvoker, ProcessInvoker, ProcessResult};
pub use probe::{DockerProbe, SandboxProbe};
