// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use async_trait::async_trait;

/// Port for the external media engine
///
/// The engine works on a private namespace of named byte buffers. Callers
/// never touch it directly; `EngineClient` gates every call on a completed
/// `load`.
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Prepare the engine; called at most once per client
    async fn load(&self) -> Result<(), DomainError>;

    /// Stage a buffer under `name`, replacing any previous buffer of that name
    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError>;

    /// Run the engine with an argument list
    async fn exec(&self, args: &[String]) -> Result<(), DomainError>;

    /// Read a buffer the engine produced
    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError>;

    /// Drop a buffer from the namespace; a missing buffer is not an error
    async fn remove_file(&self, name: &str) -> Result<(), DomainError>;
}

/// Port for learning a clip's duration before a session starts
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Duration in seconds of the media file at `file_path`
    async fn probe_duration(&self, file_path: &str) -> Result<f64, DomainError>;
}

/// Port for handing a finished artifact to the user
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Deliver `bytes` under `file_name`; returns where it ended up
    async fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<String, DomainError>;
}

/// Port for the video surface the user watches
pub trait PlaybackPort: Send + Sync {
    /// Move the play position
    fn seek(&self, seconds: f64);

    /// Show a freshly produced or cached preview
    fn present_preview(&self, buffer: &[u8]);
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    /// Retryable by the user; session stays valid
    Transient,
    /// Session cannot continue
    Fatal,
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct UserNotice {
    pub severity: NoticeSeverity,
    pub message: String,
    pub detail: Option<String>,
}

impl UserNotice {
    /// Build the notice for an engine or environment error
    pub fn from_error(summary: &str, error: &DomainError) -> Self {
        let severity = if error.is_fatal() {
            NoticeSeverity::Fatal
        } else {
            NoticeSeverity::Transient
        };
        Self {
            severity,
            message: summary.to_string(),
            detail: Some(error.to_string()),
        }
    }
}

/// Port for user-facing notifications
///
/// Only the trim interactor raises notices, so failures reach the user
/// through exactly one path.
pub trait NotifyPort: Send + Sync {
    fn notify(&self, notice: UserNotice);
}
