//! Dynamic library config modules.
//!
//! A config module is a C-ABI dynamic library that exports its task mapping
//! as JSON. String and array values behave exactly like their static-format
//! counterparts; a `null` value marks a producer entry whose commands are
//! generated at resolution time from the matched file list.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use libloading::{Library, Symbol};
use serde_json::Value;

use crate::config::tasks::{command_spec_from_value, CommandProducer, CommandSpec, TaskMap};
use crate::types::{StagehandError, StagehandResult};

/// Module function signatures for the C ABI interface
type ConfigFn = unsafe extern "C" fn() -> *const c_char;
type CommandsFn = extern "C" fn(*const c_char, *const c_char) -> *const c_char;
type CleanupStringFn = extern "C" fn(*const c_char);

/// A task configuration loaded from a dynamic library
pub struct ModuleConfig {
    path: PathBuf,
    library: Library,
    call_lock: Mutex<()>, // Prevent concurrent calls into the same module
}

impl ModuleConfig {
    /// Load a config module from a dynamic library file
    pub fn load(path: &Path) -> Result<Arc<Self>> {
        let library = unsafe {
            Library::new(path)
                .with_context(|| format!("Failed to load config module: {}", path.display()))?
        };

        Ok(Arc::new(Self {
            path: path.to_path_buf(),
            library,
            call_lock: Mutex::new(()),
        }))
    }

    /// Read the module's exported task mapping.
    ///
    /// Entries whose value is `null` are bound to this module as producers
    /// and invoked with the matched files when the entry is resolved.
    pub fn task_map(self: &Arc<Self>) -> Result<TaskMap> {
        let value = self.exported_config()?;
        let object = value.as_object().ok_or_else(|| {
            anyhow::anyhow!(
                "Config module {} did not export a mapping",
                self.path.display()
            )
        })?;

        let mut map = TaskMap::new();
        for (pattern, raw) in object {
            let commands = if raw.is_null() {
                CommandSpec::Producer {
                    pattern: pattern.clone(),
                    producer: Arc::clone(self) as Arc<dyn CommandProducer>,
                }
            } else {
                command_spec_from_value(raw).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Config module {} exported an unusable value for '{}'",
                        self.path.display(),
                        pattern
                    )
                })?
            };
            map.push(pattern.clone(), commands);
        }

        Ok(map)
    }

    fn exported_config(&self) -> Result<Value> {
        let _guard = self.call_lock.lock().expect("module call mutex poisoned");

        unsafe {
            let config_fn: Symbol<ConfigFn> = self
                .library
                .get(b"stagehand_config")
                .context("Config module missing stagehand_config function")?;

            let result_ptr = config_fn();
            self.read_json(result_ptr)?.ok_or_else(|| {
                anyhow::anyhow!(
                    "Config module {} returned no configuration",
                    self.path.display()
                )
            })
        }
    }

    /// Read a returned C string as JSON, releasing it through the module's
    /// cleanup function when one is exported.
    unsafe fn read_json(&self, result_ptr: *const c_char) -> Result<Option<Value>> {
        if result_ptr.is_null() {
            return Ok(None);
        }

        let result_cstr = CStr::from_ptr(result_ptr);
        let text = result_cstr
            .to_str()
            .context("Config module returned invalid UTF-8")?
            .to_string();

        if let Ok(cleanup_fn) = self
            .library
            .get::<Symbol<CleanupStringFn>>(b"stagehand_cleanup_string")
        {
            cleanup_fn(result_ptr);
        }

        if text.trim().is_empty() || text == "null" {
            return Ok(None);
        }

        let value = serde_json::from_str(&text)
            .with_context(|| format!("Config module returned invalid JSON: {}", text))?;
        Ok(Some(value))
    }
}

impl CommandProducer for ModuleConfig {
    fn commands_for(&self, pattern: &str, files: &[String]) -> StagehandResult<CommandSpec> {
        let _guard = self.call_lock.lock().expect("module call mutex poisoned");

        let pattern_cstr = CString::new(pattern)
            .map_err(|_| StagehandError::Module(format!("Pattern '{}' contains NUL", pattern)))?;
        let files_json = serde_json::to_string(files)?;
        let files_cstr = CString::new(files_json)
            .map_err(|_| StagehandError::Module("File list contains NUL".to_string()))?;

        let commands_fn: Symbol<CommandsFn> =
            unsafe { self.library.get(b"stagehand_commands") }.map_err(|_| {
                StagehandError::Module(format!(
                    "Config module {} has no stagehand_commands export",
                    self.path.display()
                ))
            })?;

        let result_ptr = commands_fn(pattern_cstr.as_ptr(), files_cstr.as_ptr());
        let value = unsafe { self.read_json(result_ptr) }
            .map_err(|e| StagehandError::Module(format!("{:#}", e)))?
            .ok_or_else(|| {
                StagehandError::Module(format!(
                    "Config module returned no commands for '{}'",
                    pattern
                ))
            })?;

        command_spec_from_value(&value).ok_or_else(|| {
            StagehandError::Module(format!(
                "Config module returned unusable commands for '{}'",
                pattern
            ))
        })
    }
}
