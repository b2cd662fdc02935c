use thiserror::Error;

/// The main error type for stagehand operations
#[derive(Debug, Error)]
pub enum StagehandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Module error: {0}")]
    Module(String),

    #[error("{0}")]
    Task(String),
}

/// Result type alias for stagehand operations
pub type StagehandResult<T> = Result<T, StagehandError>;
