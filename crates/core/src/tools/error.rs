//! Error types for the tools module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while invoking an external tool.
///
/// A tool that runs but exits non-zero is not an error at this level; the
/// caller decides what a non-zero exit or a missing output file means.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool binary not found.
    #[error("{tool} not found at path: {path}")]
    NotFound { tool: String, path: PathBuf },

    /// Tool could not be started.
    #[error("Failed to start {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The stdout log file could not be created.
    #[error("Failed to create log file: {path}")]
    LogFileFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Maps a spawn error, distinguishing a missing binary.
    pub fn from_spawn(tool: &str, path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                tool: tool.to_string(),
                path: path.to_path_buf(),
            }
        } else {
            Self::SpawnFailed {
                tool: tool.to_string(),
                source: error,
            }
        }
    }
}
