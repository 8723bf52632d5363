//! Error types for the analysis pipeline.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can surface from the analysis pipeline.
///
/// Enumeration faults on individual files or processes never reach this
/// type: they are skipped where they happen. What remains is either fatal
/// to the whole run or handled by the runner and folded into the
/// execution record.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Filesystem operation failed on a specific path.
    #[error("io error on {path}: {source}")]
    Io {
        /// Path being accessed
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// The process or socket table could not be read at all.
    #[error("procfs error: {0}")]
    Procfs(String),

    /// Configuration file exists but is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The target could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that was being launched
        program: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Report serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The pipeline body panicked.
    #[error("pipeline panicked: {0}")]
    Panicked(String),
}

impl AnalysisError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = AnalysisError::io(
            "/sandbox/output/report.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/sandbox/output/report.json"));
        assert!(msg.contains("denied"));
    }
}
