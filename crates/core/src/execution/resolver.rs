//! Task resolution: from configured commands to runnable tasks.

use std::path::PathBuf;

use crate::config::tasks::CommandSpec;
use crate::context::{ErrorMarker, RunContext};
use crate::execution::command::{build_invocation, Invocation, TaskSpec};
use crate::execution::exec::{self, ExecutionOutcome, SpawnOptions};
use crate::types::{StagehandError, StagehandResult};

/// Execution options shared by every command expanded from one config entry
#[derive(Debug, Clone, Default)]
pub struct TaskOptions {
    /// Files the entry's pattern matched; never empty
    pub files: Vec<String>,
    pub shell: bool,
    pub git_dir: Option<PathBuf>,
    pub relative: bool,
}

impl TaskOptions {
    fn task_spec(&self, command: &str, is_fn: bool) -> TaskSpec {
        TaskSpec {
            command: command.to_string(),
            files: self.files.clone(),
            is_fn,
            shell: self.shell,
            git_dir: self.git_dir.clone(),
            relative: self.relative,
        }
    }
}

/// One runnable task. Running it spawns the underlying process exactly once
/// and reports the classified outcome.
#[derive(Debug, Clone)]
pub struct ResolvedTask {
    display: String,
    invocation: Invocation,
}

/// Expand one config entry into its sibling tasks.
///
/// A producer is invoked with the matched file list; a sequence expands
/// element by element, in order. Commands that originate from a producer
/// are taken as complete and never have files appended.
pub fn make_command_tasks(
    commands: &CommandSpec,
    options: &TaskOptions,
) -> StagehandResult<Vec<ResolvedTask>> {
    let mut tasks = Vec::new();
    expand(commands, options, false, &mut tasks)?;
    Ok(tasks)
}

fn expand(
    commands: &CommandSpec,
    options: &TaskOptions,
    from_producer: bool,
    out: &mut Vec<ResolvedTask>,
) -> StagehandResult<()> {
    match commands {
        CommandSpec::Literal(command) => {
            out.push(resolve_task(options.task_spec(command, from_producer))?);
        }
        CommandSpec::Sequence(items) => {
            for item in items {
                expand(item, options, from_producer, out)?;
            }
        }
        CommandSpec::Producer { pattern, producer } => {
            let produced = producer.commands_for(pattern, &options.files)?;
            expand(&produced, options, true, out)?;
        }
    }
    Ok(())
}

/// Resolve one task spec into a runnable task
pub fn resolve_task(spec: TaskSpec) -> StagehandResult<ResolvedTask> {
    let invocation = build_invocation(&spec)?;
    Ok(ResolvedTask {
        display: spec.command,
        invocation,
    })
}

impl ResolvedTask {
    /// The configured command string, as shown in failure messages
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Spawn the underlying process and return its raw outcome
    pub async fn execute(&self) -> ExecutionOutcome {
        let options = SpawnOptions {
            cwd: self.invocation.cwd.clone(),
            shell: self.invocation.shell,
            prefer_local: true,
        };
        if self.invocation.shell {
            exec::spawn(&self.invocation.command_line, &[], &options).await
        } else {
            exec::spawn(&self.invocation.program, &self.invocation.args, &options).await
        }
    }

    /// Run the task and classify its outcome.
    ///
    /// On every failure path the `TaskError` marker is recorded into the
    /// supplied context before the error is returned; success leaves the
    /// context untouched. Outcomes are reported exactly once, with no
    /// retries.
    pub async fn run(&self, context: Option<&RunContext>) -> StagehandResult<()> {
        let outcome = self.execute().await;
        match outcome_error(&self.display, &outcome) {
            Some(message) => {
                if let Some(context) = context {
                    context.add_error(ErrorMarker::TaskError);
                }
                Err(StagehandError::Task(message))
            }
            None => Ok(()),
        }
    }
}

/// Classify a raw outcome into a failure message, or `None` on success.
///
/// First match wins: `failed`, then a kill without a signal, then the
/// signal name regardless of the kill flag.
pub fn outcome_error(display: &str, outcome: &ExecutionOutcome) -> Option<String> {
    if outcome.failed {
        Some(format!("{} [FAILED]", display))
    } else if outcome.killed && outcome.signal.is_none() {
        Some(format!("{} [KILLED]", display))
    } else if let Some(signal) = &outcome.signal {
        Some(format!("{} [{}]", display, signal))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::tasks::CommandProducer;

    fn options() -> TaskOptions {
        TaskOptions {
            files: vec!["test.js".to_string()],
            ..TaskOptions::default()
        }
    }

    fn outcome(failed: bool, killed: bool, signal: Option<&str>) -> ExecutionOutcome {
        ExecutionOutcome {
            failed,
            killed,
            signal: signal.map(|s| s.to_string()),
            cmd: "mock cmd".to_string(),
            ..ExecutionOutcome::default()
        }
    }

    #[test]
    fn failed_outcome_classifies_first() {
        let message = outcome_error("mock-fail-linter", &outcome(true, false, None))
            .expect("failure expected");
        assert_eq!(message, "mock-fail-linter [FAILED]");
    }

    #[test]
    fn killed_without_signal_classifies_as_killed() {
        let message = outcome_error("mock-killed-linter", &outcome(false, true, None))
            .expect("failure expected");
        assert_eq!(message, "mock-killed-linter [KILLED]");
    }

    #[test]
    fn signal_wins_over_kill_flag() {
        let message = outcome_error("mock-killed-linter", &outcome(false, true, Some("SIGINT")))
            .expect("failure expected");
        assert_eq!(message, "mock-killed-linter [SIGINT]");

        let message = outcome_error("mock-killed-linter", &outcome(false, false, Some("SIGINT")))
            .expect("failure expected");
        assert_eq!(message, "mock-killed-linter [SIGINT]");
    }

    #[test]
    fn clean_exit_classifies_as_success() {
        assert!(outcome_error("jest", &outcome(false, false, None)).is_none());
    }

    #[test]
    fn sequence_expands_to_sibling_tasks() {
        let commands = CommandSpec::Sequence(vec![
            CommandSpec::Literal("eslint --fix".to_string()),
            CommandSpec::Literal("prettier --write".to_string()),
        ]);

        let tasks = make_command_tasks(&commands, &options()).expect("tasks");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].display(), "eslint --fix");
        assert_eq!(tasks[0].invocation().args, vec!["--fix", "test.js"]);
        assert_eq!(tasks[1].display(), "prettier --write");
    }

    struct EmbeddingProducer;

    impl CommandProducer for EmbeddingProducer {
        fn commands_for(&self, _pattern: &str, files: &[String]) -> StagehandResult<CommandSpec> {
            Ok(CommandSpec::Literal(format!("mytask {}", files.join(" "))))
        }
    }

    #[test]
    fn producer_commands_never_append_files_again() {
        let commands = CommandSpec::Producer {
            pattern: "*.js".to_string(),
            producer: Arc::new(EmbeddingProducer),
        };

        let tasks = make_command_tasks(&commands, &options()).expect("tasks");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].display(), "mytask test.js");
        // The producer already embedded test.js; the argv must not repeat it
        assert_eq!(tasks[0].invocation().args, vec!["test.js"]);
    }

    struct SequenceProducer;

    impl CommandProducer for SequenceProducer {
        fn commands_for(&self, _pattern: &str, _files: &[String]) -> StagehandResult<CommandSpec> {
            Ok(CommandSpec::Sequence(vec![
                CommandSpec::Literal("first".to_string()),
                CommandSpec::Literal("second".to_string()),
            ]))
        }
    }

    #[test]
    fn produced_sequences_run_as_siblings() {
        let commands = CommandSpec::Producer {
            pattern: "*".to_string(),
            producer: Arc::new(SequenceProducer),
        };

        let tasks = make_command_tasks(&commands, &options()).expect("tasks");
        assert_eq!(tasks.len(), 2);
        // Every produced command is complete; no files are appended
        assert!(tasks[0].invocation().args.is_empty());
        assert!(tasks[1].invocation().args.is_empty());
    }

    #[tokio::test]
    async fn failing_task_records_marker_and_errs() {
        let context = RunContext::new();
        let task = resolve_task(TaskSpec {
            command: "exit 1".to_string(),
            files: vec!["test.js".to_string()],
            shell: true,
            is_fn: true,
            ..TaskSpec::default()
        })
        .expect("task");

        let err = task.run(Some(&context)).await.expect_err("task should fail");
        assert!(err.to_string().ends_with("[FAILED]"));
        assert!(context.has_error(ErrorMarker::TaskError));
    }

    #[tokio::test]
    async fn successful_task_leaves_context_unchanged() {
        let context = RunContext::new();
        let task = resolve_task(TaskSpec {
            command: "echo ok".to_string(),
            files: vec!["test.js".to_string()],
            shell: true,
            is_fn: true,
            ..TaskSpec::default()
        })
        .expect("task");

        task.run(Some(&context)).await.expect("task should pass");
        assert!(!context.has_errors());
    }

    #[tokio::test]
    async fn unspawnable_task_fails_without_context() {
        let task = resolve_task(TaskSpec {
            command: "definitely-not-a-binary-xyz".to_string(),
            files: vec!["test.js".to_string()],
            ..TaskSpec::default()
        })
        .expect("task");

        let err = task.run(None).await.expect_err("task should fail");
        assert_eq!(
            err.to_string(),
            "definitely-not-a-binary-xyz [FAILED]"
        );
    }
}
