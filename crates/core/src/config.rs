//! Configuration acquisition
//!
//! This module locates a task specification among the supported file
//! formats, parses it, and normalizes it into a single ordered mapping.
//! "Nothing found" and "found but unusable" are distinct terminal states:
//! the first lets callers fall back to defaults, the second is a hard stop.

pub mod formats;
pub mod loader;
pub mod module;
pub mod tasks;

pub use formats::{ConfigFormat, PACKAGE_CONFIG_KEY};
pub use loader::{load_config, ConfigLoadResult, ConfigLogger, LoadOptions};
pub use module::ModuleConfig;
pub use tasks::{CommandProducer, CommandSpec, TaskEntry, TaskMap};
