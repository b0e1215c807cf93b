//! FFmpeg execution adapter
//!
//! Runs the ffmpeg binary as a child process. The engine namespace is a
//! private temporary directory created on load; buffer names map to files in
//! it and the process runs with it as its working directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::domain::errors::*;
use crate::ports::*;

/// Keep only the last N bytes of stderr as the diagnostic log
const MAX_LOG_BYTES: usize = 64 * 1024;

/// Flags placed before every argument list: overwrite outputs, quiet banner,
/// never wait on stdin
const GLOBAL_FLAGS: [&str; 3] = ["-y", "-hide_banner", "-nostdin"];

/// FFmpeg-based engine adapter
pub struct FfmpegProcessAdapter {
    ffmpeg_path: PathBuf,
    workspace: OnceLock<TempDir>,
}

impl FfmpegProcessAdapter {
    /// Create new FFmpeg adapter for the given binary
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            workspace: OnceLock::new(),
        }
    }

    /// Directory backing the namespace, once loaded
    pub fn workspace_dir(&self) -> Option<&Path> {
        self.workspace.get().map(|dir| dir.path())
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, DomainError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(DomainError::Io(format!("Invalid buffer name: {}", name)));
        }
        let dir = self.workspace_dir().ok_or(DomainError::NotReady)?;
        Ok(dir.join(name))
    }

    /// Last `MAX_LOG_BYTES` of the process' stderr, lossily decoded
    fn log_tail(stderr: &[u8]) -> String {
        let start = stderr.len().saturating_sub(MAX_LOG_BYTES);
        String::from_utf8_lossy(&stderr[start..]).trim().to_string()
    }
}

#[async_trait]
impl EnginePort for FfmpegProcessAdapter {
    async fn load(&self) -> Result<(), DomainError> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::EngineLoad(format!(
                    "Failed to start {}: {}",
                    self.ffmpeg_path.display(),
                    e
                ))
            })?;
        if !output.status.success() {
            return Err(DomainError::EngineLoad(format!(
                "{} -version exited with {}",
                self.ffmpeg_path.display(),
                output.status
            )));
        }
        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();

        let dir = tempfile::Builder::new()
            .prefix("trimmify-")
            .tempdir()
            .map_err(|e| DomainError::EngineLoad(format!("Failed to create workspace: {}", e)))?;
        info!(version = %version, workspace = %dir.path().display(), "FFmpeg engine loaded");
        self.workspace
            .set(dir)
            .map_err(|_| DomainError::EngineLoad("Engine already loaded".to_string()))?;
        Ok(())
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "Wrote engine buffer");
        Ok(())
    }

    async fn exec(&self, args: &[String]) -> Result<(), DomainError> {
        let dir = self.workspace_dir().ok_or(DomainError::NotReady)?;
        debug!(
            ffmpeg = %self.ffmpeg_path.display(),
            args = ?args,
            "Spawning FFmpeg"
        );
        let output = Command::new(&self.ffmpeg_path)
            .args(GLOBAL_FLAGS)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| DomainError::engine_failed(-1, format!("Failed to spawn FFmpeg: {}", e)))?;

        if output.status.success() {
            info!("FFmpeg completed successfully");
            return Ok(());
        }

        let code = output.status.code().unwrap_or(-1);
        let log = Self::log_tail(&output.stderr);
        let preview = log.lines().rev().take(3).collect::<Vec<_>>().join("; ");
        error!(code, "FFmpeg failed: {}", preview);
        Err(DomainError::engine_failed(code, log))
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DomainError::OutputNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_file(&self, name: &str) -> Result<(), DomainError> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed engine buffer");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tail_keeps_the_end() {
        let mut stderr = vec![b'a'; MAX_LOG_BYTES];
        stderr.extend_from_slice(b"\nlast line\n");
        let tail = FfmpegProcessAdapter::log_tail(&stderr);
        assert!(tail.ends_with("last line"));
        assert!(tail.len() <= MAX_LOG_BYTES);
    }

    #[tokio::test]
    async fn test_namespace_requires_load() {
        let adapter = FfmpegProcessAdapter::new("ffmpeg");
        assert_eq!(
            adapter.write_file("input.mp4", b"x").await,
            Err(DomainError::NotReady)
        );
        assert_eq!(adapter.exec(&[]).await, Err(DomainError::NotReady));
        assert_eq!(
            adapter.remove_file("output.mp4").await,
            Err(DomainError::NotReady)
        );
    }

    #[tokio::test]
    async fn test_missing_binary_fails_load() {
        let adapter = FfmpegProcessAdapter::new("/nonexistent/trimmify/ffmpeg");
        assert!(matches!(adapter.load().await, Err(DomainError::EngineLoad(_))));
        assert!(adapter.workspace_dir().is_none());
    }

    #[test]
    fn test_rejects_names_outside_namespace() {
        let adapter = FfmpegProcessAdapter::new("ffmpeg");
        assert!(matches!(adapter.resolve("../etc/passwd"), Err(DomainError::Io(_))));
        assert!(matches!(adapter.resolve(".."), Err(DomainError::Io(_))));
        assert!(matches!(adapter.resolve(""), Err(DomainError::Io(_))));
        assert_eq!(adapter.resolve("input.mp4"), Err(DomainError::NotReady));
    }
}
