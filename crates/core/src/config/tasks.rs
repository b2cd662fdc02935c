//! The normalized task specification mapping.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::types::StagehandResult;

/// Produces commands for a pattern at resolution time, given the files the
/// pattern matched. Implemented by dynamic config modules.
pub trait CommandProducer: Send + Sync {
    fn commands_for(&self, pattern: &str, files: &[String]) -> StagehandResult<CommandSpec>;
}

/// One configured command value: a literal command line, an ordered sequence
/// of commands, or a producer invoked with the matched file list.
#[derive(Clone)]
pub enum CommandSpec {
    Literal(String),
    Sequence(Vec<CommandSpec>),
    Producer {
        pattern: String,
        producer: Arc<dyn CommandProducer>,
    },
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Literal(command) => write!(f, "{}", command),
            CommandSpec::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            CommandSpec::Producer { .. } => write!(f, "<module producer>"),
        }
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Literal(command) => f.debug_tuple("Literal").field(command).finish(),
            CommandSpec::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            CommandSpec::Producer { pattern, .. } => {
                f.debug_struct("Producer").field("pattern", pattern).finish()
            }
        }
    }
}

/// One entry of the task mapping.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    pub pattern: String,
    pub commands: CommandSpec,
}

/// Ordered mapping from glob pattern to configured commands.
///
/// Entry order is the source document's key order and determines command
/// execution order for file groups that match multiple patterns.
#[derive(Debug, Clone, Default)]
pub struct TaskMap {
    entries: Vec<TaskEntry>,
}

impl TaskMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pattern: impl Into<String>, commands: CommandSpec) {
        self.entries.push(TaskEntry {
            pattern: pattern.into(),
            commands,
        });
    }

    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalize a parsed document into a task mapping. Returns `None` when
    /// the document is not a mapping from pattern to command string(s).
    pub fn from_value(value: &Value) -> Option<TaskMap> {
        let object = value.as_object()?;
        let mut map = TaskMap::new();
        for (pattern, raw) in object {
            map.push(pattern.clone(), command_spec_from_value(raw)?);
        }
        Some(map)
    }
}

/// Interpret one mapping value: a string is a single command, an array of
/// strings an ordered sequence. Anything else is unusable.
pub(crate) fn command_spec_from_value(value: &Value) -> Option<CommandSpec> {
    match value {
        Value::String(command) => Some(CommandSpec::Literal(command.clone())),
        Value::Array(items) => {
            let mut sequence = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(command) => sequence.push(CommandSpec::Literal(command.clone())),
                    _ => return None,
                }
            }
            Some(CommandSpec::Sequence(sequence))
        }
        _ => None,
    }
}
