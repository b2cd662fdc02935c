//! Configuration discovery and loading.

use std::path::{Path, PathBuf};

use crate::config::formats::{self, ConfigFormat, Parsed};
use crate::config::module::ModuleConfig;
use crate::config::tasks::TaskMap;
use crate::platform;
use crate::types::{StagehandError, StagehandResult};

/// Candidate file names searched when no explicit path is given, in
/// precedence order. The dynamic module candidate is appended last because
/// its name depends on the platform.
const SEARCH_PLACES: &[&str] = &[
    "package.json",
    "package.yaml",
    "package.yml",
    ".stagehandrc",
    ".stagehandrc.json",
    ".stagehandrc.yaml",
    ".stagehandrc.yml",
    ".stagehandrc.toml",
];

/// Injected sink for non-fatal loader diagnostics
pub trait ConfigLogger {
    fn warn(&self, message: &str);
}

/// Options controlling where configuration is looked for
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Base directory searched for candidate files, and the anchor for
    /// relative explicit paths. Defaults to the current directory.
    pub cwd: Option<PathBuf>,
    /// Explicit config file path or module specifier
    pub config_path: Option<String>,
}

/// Terminal states of one load call
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// No configuration was located; the caller decides fallback policy
    NotFound,
    /// A file was located but its content is unusable. Callers must stop
    /// and report instead of falling back to other sources.
    Invalid { filepath: PathBuf },
    /// A usable task mapping
    Loaded { config: TaskMap, filepath: PathBuf },
}

/// Locate, parse, and normalize a task configuration.
///
/// An explicit `config_path` is tried as a literal file path first and as a
/// platform-named module specifier second; without one, the base directory
/// is searched for the first existing candidate file. Ancestor directories
/// are the caller's concern.
pub fn load_config(
    options: &LoadOptions,
    logger: Option<&dyn ConfigLogger>,
) -> StagehandResult<ConfigLoadResult> {
    let cwd = match &options.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    match &options.config_path {
        Some(specifier) => match resolve_explicit_path(&cwd, specifier) {
            Some(path) => load_config_file(&path, logger),
            None => {
                if let Some(logger) = logger {
                    logger.warn(&format!("Could not locate configuration '{}'", specifier));
                }
                Ok(ConfigLoadResult::NotFound)
            }
        },
        None => search_config(&cwd, logger),
    }
}

/// Resolve an explicit specifier: a literal path wins, then the platform's
/// dynamic library renderings of a bare module name.
fn resolve_explicit_path(cwd: &Path, specifier: &str) -> Option<PathBuf> {
    let literal = cwd.join(specifier);
    if literal.is_file() {
        return Some(literal);
    }

    for candidate in platform::module_candidates(specifier) {
        let path = cwd.join(candidate);
        if path.is_file() {
            return Some(path);
        }
    }

    None
}

/// Walk the candidate cascade. A candidate that exists but carries no
/// config (a manifest without the key, an unreadable rc JSON file) lets the
/// search continue; a found-invalid candidate stops it.
fn search_config(
    cwd: &Path,
    logger: Option<&dyn ConfigLogger>,
) -> StagehandResult<ConfigLoadResult> {
    let module_candidate = platform::module_config_file_name();
    let candidates = SEARCH_PLACES
        .iter()
        .copied()
        .chain(std::iter::once(module_candidate.as_str()));

    for name in candidates {
        let path = cwd.join(name);
        if !path.is_file() {
            continue;
        }
        match load_config_file(&path, logger)? {
            ConfigLoadResult::NotFound => continue,
            result => return Ok(result),
        }
    }

    Ok(ConfigLoadResult::NotFound)
}

fn load_config_file(
    path: &Path,
    logger: Option<&dyn ConfigLogger>,
) -> StagehandResult<ConfigLoadResult> {
    let format = ConfigFormat::detect(path);

    if format == ConfigFormat::Module {
        let module = ModuleConfig::load(path)
            .map_err(|e| StagehandError::Module(format!("{:#}", e)))?;
        let config = module
            .task_map()
            .map_err(|e| StagehandError::Module(format!("{:#}", e)))?;
        return Ok(ConfigLoadResult::Loaded {
            config,
            filepath: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;

    match formats::parse(format, &content) {
        Parsed::Document(value) => match TaskMap::from_value(&value) {
            Some(config) => Ok(ConfigLoadResult::Loaded {
                config,
                filepath: path.to_path_buf(),
            }),
            None => Ok(ConfigLoadResult::Invalid {
                filepath: path.to_path_buf(),
            }),
        },
        Parsed::Unusable => Ok(ConfigLoadResult::Invalid {
            filepath: path.to_path_buf(),
        }),
        Parsed::Absent => {
            if format == ConfigFormat::Json {
                if let Some(logger) = logger {
                    logger.warn(&format!(
                        "Ignoring invalid configuration file: {}",
                        path.display()
                    ));
                }
            }
            Ok(ConfigLoadResult::NotFound)
        }
    }
}
