//! Error types for the logging system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error while loading configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    Config { component: String, message: String },

    /// Sink write or flush failure
    #[error("sink error for '{target}': {message}")]
    Sink { target: String, message: String },

    /// Submit attempted on a pool that has been shut down
    #[error("thread pool is closed")]
    PoolClosed,

    /// A pooled task panicked or its worker died before completion
    #[error("pooled task failed before producing a result")]
    TaskFailed,

    /// Remote backup connect/write failure
    #[error("backup error for {endpoint}: {message}")]
    Backup { endpoint: String, message: String },
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Config {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(target: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Sink {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a remote backup error
    pub fn backup(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Backup {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}
