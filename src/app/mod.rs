// Application layer - Use case interactors

pub mod container;
pub mod trim_interactor;
pub mod upload_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use trim_interactor::{ActionOutcome, SessionPorts, TrimInteractor};
pub use upload_interactor::{UploadCandidate, UploadInteractor, UploadOrigin};
