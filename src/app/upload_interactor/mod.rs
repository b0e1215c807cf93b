// Upload interactor - Accepts source clips from the user

use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;

/// How a file reached the upload boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOrigin {
    DragDrop,
    FilePicker,
    Paste,
}

/// A file offered by the user, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct UploadCandidate {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Interactor for the upload boundary
///
/// A rejected upload produces an error and no `ClipSource`; no session is
/// ever started for it.
pub struct UploadInteractor {
    policy: UploadPolicy,
}

impl UploadInteractor {
    pub fn new(policy: UploadPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate a dropped, picked or pasted file
    pub fn accept(
        &self,
        origin: UploadOrigin,
        candidate: UploadCandidate,
    ) -> Result<ClipSource, DomainError> {
        if let Err(err) = self
            .policy
            .validate(&candidate.mime, candidate.bytes.len() as u64)
        {
            warn!(?origin, file = %candidate.file_name, error = %err, "Upload rejected");
            return Err(err);
        }
        let source = ClipSource::new(candidate.file_name, candidate.mime, candidate.bytes);
        info!(
            ?origin,
            clip = %source.handle,
            file = %source.file_name,
            size = source.size(),
            "Upload accepted"
        );
        Ok(source)
    }

    /// Accept the first pasted item of the accepted type
    ///
    /// A paste without such an item is ignored and yields `Ok(None)`.
    pub fn accept_paste(
        &self,
        items: Vec<UploadCandidate>,
    ) -> Result<Option<ClipSource>, DomainError> {
        let total = items.len();
        match items
            .into_iter()
            .find(|item| self.policy.accepts_mime(&item.mime))
        {
            Some(item) => self.accept(UploadOrigin::Paste, item).map(Some),
            None => {
                debug!(items = total, "Paste carried no acceptable video");
                Ok(None)
            }
        }
    }

    /// Read and validate a file from disk, guessing its type from the extension
    ///
    /// Type and size are checked before the contents are read.
    pub async fn accept_path(&self, path: &Path) -> Result<ClipSource, DomainError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| DomainError::Io(format!("Not a file: {}", path.display())))?;
        let mime = mime_from_extension(&file_name);
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| DomainError::Io(format!("{}: {}", path.display(), e)))?
            .len();
        self.policy.validate(mime, size)?;

        let bytes = tokio::fs::read(path).await?;
        self.accept(
            UploadOrigin::FilePicker,
            UploadCandidate::new(file_name, mime, bytes),
        )
    }
}
