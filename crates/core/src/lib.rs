//! Stagehand Core Library
//!
//! This is the core library for the stagehand staged-file task runner. It
//! provides configuration acquisition and task command resolution: a
//! configured mapping from glob pattern to commands is discovered among the
//! supported file formats, and each entry is resolved into runnable tasks
//! whose outcomes are classified and aggregated into shared run state.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration discovery, format parsers, and the
//!   normalized task mapping
//! - [`execution`] - Command tokenization, the process spawning boundary,
//!   and task resolution with outcome classification
//! - [`context`] - Shared run state accumulating error markers
//! - [`platform`] - Dynamic config module naming per platform
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stagehand_core::config::{load_config, ConfigLoadResult, LoadOptions};
//! use stagehand_core::execution::{make_command_tasks, TaskOptions};
//! use stagehand_core::RunContext;
//!
//! # async fn example() -> stagehand_core::types::StagehandResult<()> {
//! let options = LoadOptions::default();
//! if let ConfigLoadResult::Loaded { config, .. } = load_config(&options, None)? {
//!     let context = RunContext::new();
//!     for entry in config.entries() {
//!         let task_options = TaskOptions {
//!             files: vec!["src/main.js".to_string()],
//!             ..TaskOptions::default()
//!         };
//!         for task in make_command_tasks(&entry.commands, &task_options)? {
//!             task.run(Some(&context)).await?;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod execution;
pub mod platform;
pub mod types;

// Re-export the main types for easier usage
pub use config::{load_config, ConfigLoadResult, LoadOptions, TaskMap};
pub use context::{ErrorMarker, RunContext};
pub use execution::{make_command_tasks, resolve_task, ResolvedTask, TaskOptions};
pub use types::{StagehandError, StagehandResult};
