//! Command string tokenization and invocation construction.
//!
//! This module turns one configured command plus its file set and execution
//! options into a concrete process invocation: binary, argument list,
//! working directory, and shell flag.

use std::path::PathBuf;

use crate::types::{StagehandError, StagehandResult};

/// Conventional binary name of the version control client. Commands running
/// it get the repository root as their working directory.
const GIT_BINARY: &str = "git";

/// One configured command plus the file set it applies to and its execution
/// options.
#[derive(Debug, Clone, Default)]
pub struct TaskSpec {
    /// The command line as configured (or as produced by a config module)
    pub command: String,
    /// Files the command applies to; never empty for a resolvable spec
    pub files: Vec<String>,
    /// The command came from a producer and is taken as already complete
    pub is_fn: bool,
    /// Execute through the shell instead of a direct argv invocation
    pub shell: bool,
    /// Repository root, used as working directory for git invocations only
    pub git_dir: Option<PathBuf>,
    /// Force the caller's current working directory regardless of `git_dir`
    pub relative: bool,
}

/// A fully constructed process invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Binary to spawn. Unused in shell mode.
    pub program: String,
    /// Argument list. Empty in shell mode.
    pub args: Vec<String>,
    /// The command line executed in shell mode: the original string, with
    /// files appended unless the command came from a producer.
    pub command_line: String,
    /// Working directory override, or `None` to inherit
    pub cwd: Option<PathBuf>,
    pub shell: bool,
}

/// Split a command line into tokens, honoring double and single quotes so a
/// quoted path with spaces stays one argument. Outside single quotes a
/// backslash escapes the next character.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(_) => {
                if c == '"' {
                    quote = None;
                } else if c == '\\' {
                    match chars.next() {
                        Some(next @ ('"' | '\\')) => current.push(next),
                        Some(next) => {
                            current.push('\\');
                            current.push(next);
                        }
                        None => current.push('\\'),
                    }
                } else {
                    current.push(c);
                }
            }
            None => {
                if c.is_whitespace() {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                } else if c == '\'' || c == '"' {
                    quote = Some(c);
                    in_token = true;
                } else if c == '\\' {
                    in_token = true;
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                } else {
                    current.push(c);
                    in_token = true;
                }
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}

/// Construct the process invocation for a task spec.
///
/// Files are appended as trailing positional arguments only for a plain
/// literal, non-shell command: a producer-supplied command is taken as
/// complete, and a shell command gets them appended to the command line
/// instead of the argv.
pub fn build_invocation(spec: &TaskSpec) -> StagehandResult<Invocation> {
    let mut tokens = tokenize(&spec.command);
    if tokens.is_empty() {
        return Err(StagehandError::Config(format!(
            "Command '{}' resolves to nothing runnable",
            spec.command
        )));
    }

    let program = tokens.remove(0);
    let mut args = tokens;
    if !spec.is_fn && !spec.shell {
        args.extend(spec.files.iter().cloned());
    }

    let command_line = if spec.shell && !spec.is_fn {
        let mut line = spec.command.clone();
        for file in &spec.files {
            line.push(' ');
            line.push_str(file);
        }
        line
    } else {
        spec.command.clone()
    };

    let cwd = if spec.relative {
        Some(std::env::current_dir()?)
    } else if program == GIT_BINARY {
        spec.git_dir.clone()
    } else {
        None
    };

    Ok(Invocation {
        program,
        args,
        command_line,
        cwd,
        shell: spec.shell,
    })
}
