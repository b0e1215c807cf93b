// Filesystem download adapter - Delivers finished artifacts into a directory

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::errors::*;
use crate::ports::*;

/// Writes delivered artifacts into an output directory
pub struct FsDownloadAdapter {
    output_dir: PathBuf,
}

impl FsDownloadAdapter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Destination for a delivered name; only the final path component is kept
    pub fn destination(&self, file_name: &str) -> Result<PathBuf, DomainError> {
        let base = Path::new(file_name)
            .file_name()
            .ok_or_else(|| DomainError::Io(format!("Invalid download name: {}", file_name)))?;
        Ok(self.output_dir.join(base))
    }
}

#[async_trait]
impl DownloadPort for FsDownloadAdapter {
    async fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        let path = self.destination(file_name)?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "Delivered download");
        Ok(path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_deliver_writes_into_output_dir() {
        let dir = TempDir::new().unwrap();
        let adapter = FsDownloadAdapter::new(dir.path().join("out"));
        let location = adapter.deliver("trimmed-clip.mp4", b"data").await.unwrap();
        let written = std::fs::read(dir.path().join("out").join("trimmed-clip.mp4")).unwrap();
        assert_eq!(written, b"data");
        assert!(location.ends_with("trimmed-clip.mp4"));
    }

    #[test]
    fn test_destination_strips_directories() {
        let adapter = FsDownloadAdapter::new("/tmp/out");
        let path = adapter.destination("../../etc/trimmed-x.mp4").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/out/trimmed-x.mp4"));
        assert!(adapter.destination("..").is_err());
    }
}
