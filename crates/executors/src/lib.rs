pub mod command;
pub mod result;
pub mod runner;

pub use command::{CommandError, CommandLine, ExecutionMode, Kubectl, SubcommandPolicy};
pub use result::{ExecutionResult, Outcome};
pub use runner::{CommandRunner, LocalCommandRunner};
