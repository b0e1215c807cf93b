// Memory engine adapter - In-process stand-in for the media engine

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// What a scripted `exec` does
#[derive(Debug, Clone, PartialEq)]
pub enum ExecBehavior {
    /// Succeed and write the last argument as an output buffer whose contents
    /// are the joined argument list; thumbnail patterns produce the listed
    /// sequence numbers
    Echo { thumbnails: Vec<usize> },
    /// Succeed without producing anything
    NoOutput,
    /// Fail with an exit code and diagnostic log
    Fail { code: i32, log: String },
}

/// Engine adapter that keeps its namespace in memory
///
/// Records every argument list it receives, which makes it the engine of
/// choice for tests and dry runs.
pub struct MemoryEngineAdapter {
    files: Mutex<HashMap<String, Vec<u8>>>,
    behavior: Mutex<ExecBehavior>,
    load_error: Option<String>,
    exec_delay: Option<Duration>,
    loads: AtomicUsize,
    history: Mutex<Vec<Vec<String>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MemoryEngineAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngineAdapter {
    /// Engine that echoes outputs and produces no thumbnails
    pub fn new() -> Self {
        Self::with_behavior(ExecBehavior::Echo {
            thumbnails: Vec::new(),
        })
    }

    pub fn with_behavior(behavior: ExecBehavior) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            behavior: Mutex::new(behavior),
            load_error: None,
            exec_delay: None,
            loads: AtomicUsize::new(0),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose thumbnail runs produce only the given sequence numbers
    pub fn producing_thumbnails(sequences: &[usize]) -> Self {
        Self::with_behavior(ExecBehavior::Echo {
            thumbnails: sequences.to_vec(),
        })
    }

    /// Engine that cannot be loaded
    pub fn failing_load(message: impl Into<String>) -> Self {
        Self {
            load_error: Some(message.into()),
            ..Self::new()
        }
    }

    /// Engine whose every run fails
    pub fn failing_exec(code: i32, log: impl Into<String>) -> Self {
        Self::with_behavior(ExecBehavior::Fail {
            code,
            log: log.into(),
        })
    }

    /// Hold every `exec` for `delay` before completing
    pub fn with_exec_delay(mut self, delay: Duration) -> Self {
        self.exec_delay = Some(delay);
        self
    }

    /// Change what subsequent runs do
    pub fn set_behavior(&self, behavior: ExecBehavior) {
        *locked(&self.behavior) = behavior;
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Acquire)
    }

    /// Argument lists of every run so far, oldest first
    pub fn executed(&self) -> Vec<Vec<String>> {
        locked(&self.history).clone()
    }

    pub fn exec_count(&self) -> usize {
        locked(&self.history).len()
    }

    /// Current contents of a namespace entry
    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        locked(&self.files).get(name).cloned()
    }

    fn echo_outputs(&self, args: &[String], thumbnails: &[usize]) {
        let Some(output) = args.last() else {
            return;
        };
        let mut files = locked(&self.files);
        if let Some((prefix, suffix)) = output.split_once("%03d") {
            for sequence in thumbnails {
                let name = format!("{}{:03}{}", prefix, sequence, suffix);
                files.insert(name, format!("frame {}", sequence).into_bytes());
            }
        } else {
            files.insert(output.clone(), args.join(" ").into_bytes());
        }
    }
}

#[async_trait]
impl EnginePort for MemoryEngineAdapter {
    async fn load(&self) -> Result<(), DomainError> {
        self.loads.fetch_add(1, Ordering::AcqRel);
        match &self.load_error {
            Some(message) => Err(DomainError::EngineLoad(message.clone())),
            None => Ok(()),
        }
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        locked(&self.files).insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn exec(&self, args: &[String]) -> Result<(), DomainError> {
        locked(&self.history).push(args.to_vec());
        debug!(args = ?args, "Memory engine exec");
        if let Some(delay) = self.exec_delay {
            tokio::time::sleep(delay).await;
        }
        let behavior = locked(&self.behavior).clone();
        match behavior {
            ExecBehavior::Echo { thumbnails } => {
                self.echo_outputs(args, &thumbnails);
                Ok(())
            }
            ExecBehavior::NoOutput => Ok(()),
            ExecBehavior::Fail { code, log } => Err(DomainError::engine_failed(code, log)),
        }
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        locked(&self.files)
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::OutputNotFound(name.to_string()))
    }

    async fn remove_file(&self, name: &str) -> Result<(), DomainError> {
        locked(&self.files).remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_writes_last_argument() {
        let adapter = MemoryEngineAdapter::new();
        let args: Vec<String> = ["-i", "input.mp4", "output.mp4"].iter().map(|s| s.to_string()).collect();
        adapter.exec(&args).await.unwrap();
        assert_eq!(adapter.file("output.mp4").unwrap(), b"-i input.mp4 output.mp4".to_vec());
        assert_eq!(adapter.executed(), vec![args]);
    }

    #[tokio::test]
    async fn test_echo_expands_thumbnail_pattern() {
        let adapter = MemoryEngineAdapter::producing_thumbnails(&[1, 3]);
        adapter.exec(&["thumb_%03d.jpg".to_string()]).await.unwrap();
        assert!(adapter.file("thumb_001.jpg").is_some());
        assert!(adapter.file("thumb_002.jpg").is_none());
        assert!(adapter.file("thumb_003.jpg").is_some());
    }

    #[tokio::test]
    async fn test_behavior_can_change() {
        let adapter = MemoryEngineAdapter::new();
        adapter.set_behavior(ExecBehavior::Fail {
            code: 69,
            log: "out of memory".to_string(),
        });
        assert_eq!(
            adapter.exec(&["x".to_string()]).await,
            Err(DomainError::engine_failed(69, "out of memory"))
        );
        adapter.set_behavior(ExecBehavior::NoOutput);
        assert!(adapter.exec(&["y".to_string()]).await.is_ok());
        assert!(adapter.file("y").is_none());
        assert_eq!(adapter.exec_count(), 2);
    }

    #[tokio::test]
    async fn test_remove_tolerates_missing_buffer() {
        let adapter = MemoryEngineAdapter::new();
        adapter.write_file("output.mp4", b"old").await.unwrap();
        adapter.remove_file("output.mp4").await.unwrap();
        assert!(adapter.file("output.mp4").is_none());
        assert!(adapter.remove_file("output.mp4").await.is_ok());
    }
}
