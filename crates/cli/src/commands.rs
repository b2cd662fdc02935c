use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use colored::*;
use stagehand_core::config::{load_config, ConfigLoadResult, ConfigLogger, LoadOptions};
use stagehand_core::TaskMap;

pub mod config;
pub mod run;

/// Loader diagnostics printed to stderr
struct ConsoleLogger;

impl ConfigLogger for ConsoleLogger {
    fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }
}

/// Load the configuration, turning the loader's terminal states into CLI
/// errors: "not found" asks the user to add a config, "found but invalid"
/// is a hard stop naming the file.
fn load(dir: &Path, config_path: Option<&str>) -> Result<(TaskMap, PathBuf)> {
    let options = LoadOptions {
        cwd: Some(dir.to_path_buf()),
        config_path: config_path.map(|s| s.to_string()),
    };

    match load_config(&options, Some(&ConsoleLogger))? {
        ConfigLoadResult::Loaded { config, filepath } => Ok((config, filepath)),
        ConfigLoadResult::Invalid { filepath } => Err(anyhow!(
            "Configuration file {} exists but could not be used",
            filepath.display()
        )),
        ConfigLoadResult::NotFound => Err(anyhow!(
            "No configuration found; add a .stagehandrc file or a \"stagehand\" key to package.json"
        )),
    }
}
