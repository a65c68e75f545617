use crate::io::remote::RemoteError;
use crate::ops::store::TaskError;
use crate::parse::blob::BlobError;

/// Error type for command execution. A failing command leaves the store
/// unmodified.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Command \"{0}\" not recognized. Try \"help\".")]
    CommandNotFound(String),
    #[error("{0}")]
    ExternalUnavailable(String),
    #[error("Could not process the import code. Make sure you copied the whole code.")]
    Decode(#[from] BlobError),
}

impl CommandError {
    /// Stable name for JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Validation(_) => "validation",
            CommandError::NotFound(_) => "not_found",
            CommandError::CommandNotFound(_) => "command_not_found",
            CommandError::ExternalUnavailable(_) => "external_unavailable",
            CommandError::Decode(_) => "decode",
        }
    }
}

impl From<TaskError> for CommandError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Validation(message) => CommandError::Validation(message),
            not_found @ TaskError::NotFound(_) => CommandError::NotFound(not_found.to_string()),
        }
    }
}

impl From<RemoteError> for CommandError {
    fn from(err: RemoteError) -> Self {
        CommandError::ExternalUnavailable(err.to_string())
    }
}
