//! FFprobe adapter for media duration probing
//!
//! Asks ffprobe for the container format section as JSON and reads its
//! `duration` field.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    ffprobe_path: PathBuf,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter for the given binary
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Pull the duration out of ffprobe's JSON output
    pub fn parse_duration(json: &str) -> Result<f64, DomainError> {
        let parsed: ProbeOutput = serde_json::from_str(json)
            .map_err(|e| DomainError::Io(format!("Unreadable ffprobe output: {}", e)))?;
        let raw = parsed
            .format
            .and_then(|f| f.duration)
            .ok_or_else(|| DomainError::Io("ffprobe reported no duration".to_string()))?;
        let duration: f64 = raw
            .trim()
            .parse()
            .map_err(|_| DomainError::Io(format!("Invalid duration from ffprobe: {}", raw)))?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(DomainError::Io(format!("Invalid duration from ffprobe: {}", raw)));
        }
        Ok(duration)
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_duration(&self, file_path: &str) -> Result<f64, DomainError> {
        debug!(file = file_path, "Probing duration");
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_format", file_path])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::Io(format!(
                    "Failed to start {}: {}",
                    self.ffprobe_path.display(),
                    e
                ))
            })?;
        if !output.status.success() {
            return Err(DomainError::Io(format!(
                "ffprobe failed for {}: {}",
                file_path,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Self::parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}
