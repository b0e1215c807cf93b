//! Trimmify video trimming library
//!
//! The trim/preview core of a client-side video trimmer: a timeline state
//! machine over user-edited start/end marks, a per-session preview cache, a
//! one-shot thumbnail strip, and an argument builder that turns a session into
//! an ffmpeg invocation over named buffers.
//!
//! The layout is hexagonal. `domain` holds the model, rules and the session
//! reducer; `ports` declares the engine, probe, playback, download and notify
//! contracts; `adapters` implements them; `app` wires them into interactors.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod timeline;
pub mod utils;

// Re-export commonly used types
pub use app::{ActionOutcome, DefaultAppContainer, TrimInteractor, UploadInteractor};
pub use domain::errors::DomainError;
pub use domain::model::{ClipSource, MarkField, ProcessingMode, QualityProfile, TrimMarks};
pub use domain::session::{SessionEffect, SessionEvent, SessionState};
pub use error::{TrimmifyError, TrimmifyResult};
pub use utils::time::TimeCodec;
