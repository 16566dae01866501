use std::io;
use thiserror::Error;

/// Every way a single invocation can fail. Each variant is terminal.
#[derive(Debug, Error)]
pub enum HurlError {
    #[error("{0}")]
    Usage(String),

    #[error("Can't read {path}: {source}")]
    Indirection {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON for field '{field}': {source}")]
    MalformedField {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Failed to read response body: {0}")]
    ResponseRead(String),

    #[error("Failed to write {target}: {source}")]
    OutputWrite {
        target: String,
        #[source]
        source: io::Error,
    },
}

impl HurlError {
    pub fn usage(message: impl Into<String>) -> Self {
        HurlError::Usage(message.into())
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            HurlError::Usage(_) => 2,
            HurlError::Indirection { .. } => 3,
            HurlError::MalformedField { .. } => 4,
            HurlError::Transport(_) => 5,
            HurlError::ResponseRead(_) => 6,
            HurlError::OutputWrite { .. } => 7,
        }
    }
}
