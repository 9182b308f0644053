//! Error types for treesync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from treesync-core
    #[error(transparent)]
    Core(#[from] treesync_core::Error),

    /// Error from treesync-fs
    #[error(transparent)]
    Fs(#[from] treesync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },

    /// The plan was rejected at the confirmation prompt
    #[error("run aborted, no changes were made")]
    Aborted,
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
