// Domain errors - Error taxonomy for the trim/preview core

use thiserror::Error;

/// Domain-specific error types
///
/// `Format` and `Range` are validation failures: they are returned to the
/// caller of the edit that produced them and never turned into notifications.
/// Everything from `NotReady` down comes from the engine or the environment
/// and is reported once by the trim interactor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Time text that is not `SS`, `MM:SS` or `HH:MM:SS`
    #[error("Invalid time format: {0}. Please use HH:MM:SS")]
    Format(String),
    /// Marks out of order, too close together, or outside the clip
    #[error("Invalid time range: {0}")]
    Range(String),
    /// Engine operation attempted before the engine finished loading
    #[error("Media engine is not ready")]
    NotReady,
    /// Engine could not be loaded; fatal for the session
    #[error("Failed to load media engine: {0}")]
    EngineLoad(String),
    /// Engine ran and reported failure
    #[error("Media engine failed (code {code}): {log}")]
    EngineExecution { code: i32, log: String },
    /// Engine claimed success but the named output is missing
    #[error("Engine output not found: {0}")]
    OutputNotFound(String),
    /// Upload rejected because of its MIME type
    #[error("Unsupported file type: {0}. Only video/mp4 files are accepted")]
    UnsupportedFile(String),
    /// Upload rejected because of its size
    #[error("File size too large ({size} bytes). Maximum size is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },
    /// An action was requested while another one is processing
    #[error("Another operation is already processing")]
    Busy,
    /// Filesystem or process I/O failure in an adapter
    #[error("I/O error: {0}")]
    Io(String),
}

impl DomainError {
    /// Shorthand for an engine execution failure
    pub fn engine_failed(code: i32, log: impl Into<String>) -> Self {
        Self::EngineExecution {
            code,
            log: log.into(),
        }
    }

    /// Validation errors stay with the component that detected them
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Format(_) | DomainError::Range(_))
    }

    /// Errors after which the session cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::NotReady | DomainError::EngineLoad(_))
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}
