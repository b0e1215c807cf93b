//! Engine lifecycle client
//!
//! Wraps an [`EnginePort`] with the `Unloaded -> Loading -> Ready` lifecycle.
//! The load runs once; concurrent callers await the same load. A failed load
//! leaves the client in `Failed` for good.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::domain::errors::DomainError;
use crate::ports::EnginePort;

/// Lifecycle of the engine behind a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

impl EngineState {
    fn to_u8(self) -> u8 {
        match self {
            EngineState::Unloaded => 0,
            EngineState::Loading => 1,
            EngineState::Ready => 2,
            EngineState::Failed => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => EngineState::Loading,
            2 => EngineState::Ready,
            3 => EngineState::Failed,
            _ => EngineState::Unloaded,
        }
    }
}

/// Owned handle to the media engine
pub struct EngineClient {
    port: Arc<dyn EnginePort>,
    state: AtomicU8,
    load_outcome: OnceCell<Result<(), DomainError>>,
    executions: AtomicUsize,
}

impl EngineClient {
    /// Create an unloaded client over an engine port
    pub fn new(port: Arc<dyn EnginePort>) -> Self {
        Self {
            port,
            state: AtomicU8::new(EngineState::Unloaded.to_u8()),
            load_outcome: OnceCell::new(),
            executions: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.state() == EngineState::Ready
    }

    /// Number of `execute` calls that reached the engine
    pub fn execution_count(&self) -> usize {
        self.executions.load(Ordering::Acquire)
    }

    fn set_state(&self, state: EngineState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }

    /// Load the engine once; later calls return the first outcome
    pub async fn load(&self) -> Result<(), DomainError> {
        let outcome = self
            .load_outcome
            .get_or_init(|| async {
                self.set_state(EngineState::Loading);
                info!("Loading media engine");
                match self.port.load().await {
                    Ok(()) => {
                        self.set_state(EngineState::Ready);
                        info!("Media engine ready");
                        Ok(())
                    }
                    Err(err) => {
                        self.set_state(EngineState::Failed);
                        error!(error = %err, "Media engine failed to load");
                        Err(match err {
                            DomainError::EngineLoad(_) => err,
                            other => DomainError::EngineLoad(other.to_string()),
                        })
                    }
                }
            })
            .await;
        outcome.clone()
    }

    fn ensure_ready(&self) -> Result<(), DomainError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(DomainError::NotReady)
        }
    }

    /// Stage `bytes` under `name` in the engine namespace
    pub async fn write_input(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        self.ensure_ready()?;
        debug!(name, size = bytes.len(), "Staging engine input");
        self.port.write_file(name, bytes).await
    }

    /// Run the engine; suspends the caller until it finishes
    pub async fn execute(&self, args: &[String]) -> Result<(), DomainError> {
        self.ensure_ready()?;
        self.executions.fetch_add(1, Ordering::AcqRel);
        debug!(args = ?args, "Executing media engine");
        match self.port.exec(args).await {
            Ok(()) => Ok(()),
            Err(err @ DomainError::EngineExecution { .. }) => {
                error!(error = %err, "Media engine execution failed");
                Err(err)
            }
            Err(other) => {
                error!(error = %other, "Media engine execution failed");
                Err(DomainError::engine_failed(-1, other.to_string()))
            }
        }
    }

    /// Remove a stale buffer so the next execution cannot be confused with it
    pub async fn clear_output(&self, name: &str) -> Result<(), DomainError> {
        self.ensure_ready()?;
        debug!(name, "Clearing engine output");
        self.port.remove_file(name).await
    }

    /// Read a buffer the last execution produced
    pub async fn read_output(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        self.ensure_ready()?;
        match self.port.read_file(name).await {
            Ok(bytes) => {
                debug!(name, size = bytes.len(), "Read engine output");
                Ok(bytes)
            }
            Err(DomainError::OutputNotFound(missing)) => Err(DomainError::OutputNotFound(missing)),
            Err(other) => {
                debug!(name, error = %other, "Engine output unreadable");
                Err(DomainError::OutputNotFound(name.to_string()))
            }
        }
    }
}
