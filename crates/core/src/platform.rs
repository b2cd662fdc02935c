//! Platform detection utilities for dynamic config module resolution

/// Dynamic library file extension for the current platform (e.g. "so",
/// "dylib", "dll")
pub fn dylib_extension() -> &'static str {
    if cfg!(target_os = "windows") {
        "dll"
    } else if cfg!(target_os = "macos") {
        "dylib"
    } else {
        "so"
    }
}

/// File name of the dynamic config module candidate searched in the base
/// directory, e.g. `stagehand.config.so`
pub fn module_config_file_name() -> String {
    format!("stagehand.config.{}", dylib_extension())
}

/// File names a bare module specifier may resolve to, in resolution order
pub fn module_candidates(specifier: &str) -> Vec<String> {
    let extension = dylib_extension();
    vec![
        format!("{}.{}", specifier, extension),
        format!("lib{}.{}", specifier.replace('-', "_"), extension),
    ]
}
