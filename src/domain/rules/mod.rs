// Domain rules - Upload, download and duration policies

use crate::domain::errors::*;
use crate::domain::model::*;

/// The only MIME type the upload boundary accepts
pub const ACCEPTED_MIME: &str = "video/mp4";

/// Default upload ceiling, 500 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Prefix of every downloaded artifact name
pub const DOWNLOAD_PREFIX: &str = "trimmed-";

/// Business rules for accepting a source file
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    pub accepted_mime: &'static str,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_mime: ACCEPTED_MIME,
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    /// Whether a MIME type is accepted, ignoring parameters such as `; codecs=`
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let essence = mime.split(';').next().unwrap_or("").trim();
        essence.eq_ignore_ascii_case(self.accepted_mime)
    }

    /// Type is checked before size, matching what the user sees first
    pub fn validate(&self, mime: &str, size: u64) -> Result<(), DomainError> {
        if !self.accepts_mime(mime) {
            return Err(DomainError::UnsupportedFile(mime.to_string()));
        }
        if size > self.max_bytes {
            return Err(DomainError::FileTooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Business rules for naming the downloadable artifact
pub struct DownloadNaming;

impl DownloadNaming {
    /// `trimmed-<file name>`, using only the last path component of the source
    pub fn for_source(source_name: &str) -> String {
        let base = source_name
            .rsplit(['/', '\\'])
            .find(|segment| !segment.is_empty())
            .unwrap_or("video.mp4");
        format!("{}{}", DOWNLOAD_PREFIX, base)
    }
}

/// Business rules for the clip duration a session works with
pub struct ClipDurationRule;

impl ClipDurationRule {
    /// Floor the probed duration to whole seconds; it must fit one minimum trim
    pub fn normalize(probed_seconds: f64) -> Result<f64, DomainError> {
        if !probed_seconds.is_finite() || probed_seconds <= 0.0 {
            return Err(DomainError::Range(format!(
                "Clip duration must be positive, got {}",
                probed_seconds
            )));
        }
        let duration = probed_seconds.floor();
        if duration < MIN_TRIM_DURATION {
            return Err(DomainError::Range(format!(
                "Clip is shorter than the minimum trim of {} seconds",
                MIN_TRIM_DURATION
            )));
        }
        Ok(duration)
    }
}

/// Guess the MIME type from a file extension, for sources read from disk
pub fn mime_from_extension(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}
