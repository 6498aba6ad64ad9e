// ABOUTME: Error types for the toast manager
// Only construction can fail; runtime operations on unknown ids are no-ops

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToastError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No tokio runtime available to drive toast timers")]
    NoRuntime,

    #[error("Failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
