use std::path::PathBuf;
use thiserror::Error;

/// Failure to list the declared dependencies of a single binary.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed binary: {0}")]
    Malformed(String),
    #[error("Unsupported binary format ({0})")]
    UnsupportedFormat(String),
    #[error("{tool} exited with {status}: {stderr}")]
    Tool { tool: String, status: String, stderr: String },
    #[error("Failed to run {tool}: {source}")]
    ToolUnavailable { tool: String, source: std::io::Error },
}

#[derive(Debug, Error)]
pub enum DependencyGraphError {
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot extract dependencies of {file}: {source}")]
    Extraction { file: PathBuf, source: ExtractError },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
