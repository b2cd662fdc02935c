//! The process spawning boundary.
//!
//! [`spawn`] never errors: a binary that cannot be started surfaces as a
//! `failed` outcome and a non-zero exit is reported through the outcome
//! fields, so callers classify results programmatically instead of catching
//! exceptions.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

/// Options for one process invocation
#[derive(Debug, Clone, Default)]
pub struct SpawnOptions {
    /// Working directory override, or `None` to inherit
    pub cwd: Option<PathBuf>,
    /// Execute through `sh -c` instead of a direct argv invocation
    pub shell: bool,
    /// Prefer a binary installed under `node_modules/.bin` over one
    /// resolved from the ambient PATH
    pub prefer_local: bool,
}

/// Raw termination state of one process run
#[derive(Debug, Clone, Default)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    /// The process exited non-zero or could not be spawned
    pub failed: bool,
    /// The process was terminated by the runtime rather than a raw signal
    /// exit. Never set by [`spawn`] itself; carried so classification stays
    /// total over outcomes produced elsewhere.
    pub killed: bool,
    /// Signal name, e.g. `SIGINT`, when the process was signal-terminated
    pub signal: Option<String>,
    /// Resolved command line, for display
    pub cmd: String,
}

/// Run a process to completion and report how it terminated.
///
/// In shell mode `file` carries the entire command line and `args` is
/// ignored; otherwise `file` is the binary and `args` the argument list.
pub async fn spawn(file: &str, args: &[String], options: &SpawnOptions) -> ExecutionOutcome {
    let mut display = file.to_string();
    if !options.shell {
        for arg in args {
            display.push(' ');
            display.push_str(arg);
        }
    }

    let mut command = if options.shell {
        let mut command = Command::new("sh");
        command.arg("-c").arg(file);
        command
    } else {
        let mut command = Command::new(resolve_program(file, options));
        command.args(args);
        command
    };

    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }
    command.stdin(Stdio::null());

    let output = match command.output().await {
        Ok(output) => output,
        Err(e) => {
            return ExecutionOutcome {
                stderr: e.to_string(),
                failed: true,
                cmd: display,
                ..ExecutionOutcome::default()
            };
        }
    };

    let exit_code = output.status.code();
    ExecutionOutcome {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code,
        failed: exit_code.is_some_and(|code| code != 0),
        killed: false,
        signal: termination_signal(&output.status),
        cmd: display,
    }
}

/// Resolve the program to spawn, preferring a local installation under
/// `node_modules/.bin` when asked to.
fn resolve_program(file: &str, options: &SpawnOptions) -> String {
    if !options.prefer_local || file.contains('/') {
        return file.to_string();
    }

    let base = match &options.cwd {
        Some(cwd) => cwd.clone(),
        None => PathBuf::from("."),
    };
    let local = base.join("node_modules").join(".bin").join(file);
    if local.is_file() {
        local.to_string_lossy().into_owned()
    } else {
        file.to_string()
    }
}

#[cfg(unix)]
fn termination_signal(status: &std::process::ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;

    status.signal().map(signal_name)
}

#[cfg(not(unix))]
fn termination_signal(_status: &std::process::ExitStatus) -> Option<String> {
    None
}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    match signal {
        1 => "SIGHUP".to_string(),
        2 => "SIGINT".to_string(),
        3 => "SIGQUIT".to_string(),
        6 => "SIGABRT".to_string(),
        9 => "SIGKILL".to_string(),
        13 => "SIGPIPE".to_string(),
        15 => "SIGTERM".to_string(),
        other => format!("SIG{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_of_successful_command() {
        let outcome = spawn("echo hello", &[], &SpawnOptions {
            shell: true,
            ..SpawnOptions::default()
        })
        .await;

        assert!(!outcome.failed);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.stdout.trim(), "hello");
        assert!(outcome.signal.is_none());
    }

    #[tokio::test]
    async fn non_zero_exit_is_failed_not_an_error() {
        let outcome = spawn("exit 42", &[], &SpawnOptions {
            shell: true,
            ..SpawnOptions::default()
        })
        .await;

        assert!(outcome.failed);
        assert_eq!(outcome.exit_code, Some(42));
    }

    #[tokio::test]
    async fn unspawnable_binary_is_failed() {
        let outcome = spawn(
            "definitely-not-a-binary-xyz",
            &["--version".to_string()],
            &SpawnOptions::default(),
        )
        .await;

        assert!(outcome.failed);
        assert!(outcome.exit_code.is_none());
        assert!(!outcome.stderr.is_empty(), "spawn error should be reported");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn signal_termination_is_reported_by_name() {
        let outcome = spawn("kill -INT $$", &[], &SpawnOptions {
            shell: true,
            ..SpawnOptions::default()
        })
        .await;

        assert_eq!(outcome.signal.as_deref(), Some("SIGINT"));
        assert!(!outcome.failed, "a signal exit is not a non-zero exit");
        assert!(outcome.exit_code.is_none());
    }

    #[tokio::test]
    async fn display_command_includes_args() {
        let outcome = spawn(
            "definitely-not-a-binary-xyz",
            &["a".to_string(), "b".to_string()],
            &SpawnOptions::default(),
        )
        .await;

        assert_eq!(outcome.cmd, "definitely-not-a-binary-xyz a b");
    }
}
