//! Task command resolution and execution
//!
//! This module turns configured commands into concrete process invocations,
//! runs them, and classifies each termination into success, failure, kill,
//! or signal states that are aggregated into the shared run context.

pub mod command;
pub mod exec;
pub mod resolver;

pub use command::{build_invocation, tokenize, Invocation, TaskSpec};
pub use exec::{spawn, ExecutionOutcome, SpawnOptions};
pub use resolver::{make_command_tasks, outcome_error, resolve_task, ResolvedTask, TaskOptions};
