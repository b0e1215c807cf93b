// Domain models - Core types and data structures

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::utils::time::TimeCodec;

/// Minimum distance in seconds between the start and end marks
pub const MIN_TRIM_DURATION: f64 = 0.5;

static NEXT_CLIP_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a staged source clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipHandle(u64);

impl ClipHandle {
    /// Allocate a handle that is unique for the life of the process
    pub fn next() -> Self {
        Self(NEXT_CLIP_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClipHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip#{}", self.0)
    }
}

/// Source bytes accepted by the upload boundary
#[derive(Debug, Clone)]
pub struct ClipSource {
    pub handle: ClipHandle,
    pub file_name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl ClipSource {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            handle: ClipHandle::next(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes: Arc::from(bytes),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// User-selected start/end boundaries of the clip to extract
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimMarks {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl TrimMarks {
    /// Create marks, enforcing ordering, bounds and minimum duration
    pub fn new(start_seconds: f64, end_seconds: f64, clip_duration: f64) -> Result<Self, DomainError> {
        if !start_seconds.is_finite() || !end_seconds.is_finite() {
            return Err(DomainError::Range("Times must be finite".to_string()));
        }
        if start_seconds < 0.0 {
            return Err(DomainError::Range("Start time cannot be negative".to_string()));
        }
        if end_seconds > clip_duration {
            return Err(DomainError::Range(format!(
                "End time {} exceeds clip duration {}",
                TimeCodec::format(end_seconds),
                TimeCodec::format(clip_duration)
            )));
        }
        if start_seconds >= end_seconds {
            return Err(DomainError::Range(
                "End time must be after start time".to_string(),
            ));
        }
        if end_seconds - start_seconds < MIN_TRIM_DURATION {
            return Err(DomainError::Range(format!(
                "Trim must be at least {} seconds long",
                MIN_TRIM_DURATION
            )));
        }
        Ok(Self {
            start_seconds,
            end_seconds,
        })
    }

    /// Marks spanning the whole clip
    pub fn full(clip_duration: f64) -> Result<Self, DomainError> {
        Self::new(0.0, clip_duration, clip_duration)
    }

    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    /// Largest start that keeps the minimum trim before the current end
    pub fn latest_start(&self) -> f64 {
        let end = self.end_seconds;
        let step = f64::EPSILON * end.abs().max(1.0);
        let mut start = end - MIN_TRIM_DURATION;
        // Rounding in the subtraction can leave the gap a hair under the minimum
        while end - start < MIN_TRIM_DURATION {
            start -= step;
        }
        start.max(0.0)
    }

    /// Smallest end that keeps the minimum trim after the current start
    pub fn earliest_end(&self, clip_duration: f64) -> f64 {
        let start = self.start_seconds;
        let step = f64::EPSILON * start.abs().max(1.0);
        let mut end = start + MIN_TRIM_DURATION;
        while end - start < MIN_TRIM_DURATION {
            end += step;
        }
        end.min(clip_duration)
    }
}

impl fmt::Display for TrimMarks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            TimeCodec::format(self.start_seconds),
            TimeCodec::format(self.end_seconds)
        )
    }
}

/// Which mark a text edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkField {
    Start,
    End,
}

/// Output quality; `target_width == -1` means stream copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityProfile {
    pub label: &'static str,
    pub target_width: i32,
    pub target_height: i32,
    /// Opaque engine bitrate literal such as `2M` or `800k`
    pub bitrate: &'static str,
}

impl QualityProfile {
    pub const ORIGINAL: QualityProfile = QualityProfile {
        label: "Original",
        target_width: -1,
        target_height: -1,
        bitrate: "copy",
    };

    /// Whether the video stream is copied without re-encoding
    pub fn is_stream_copy(&self) -> bool {
        self.target_width == -1
    }

    /// Find a profile by label, ignoring case
    pub fn by_label(label: &str) -> Option<QualityProfile> {
        QUALITY_PROFILES
            .iter()
            .find(|q| q.label.eq_ignore_ascii_case(label.trim()))
            .copied()
    }
}

impl Default for QualityProfile {
    fn default() -> Self {
        Self::ORIGINAL
    }
}

/// The fixed set of selectable profiles
pub const QUALITY_PROFILES: [QualityProfile; 5] = [
    QualityProfile::ORIGINAL,
    QualityProfile {
        label: "1080p",
        target_width: 1920,
        target_height: 1080,
        bitrate: "2M",
    },
    QualityProfile {
        label: "720p",
        target_width: 1280,
        target_height: 720,
        bitrate: "1M",
    },
    QualityProfile {
        label: "480p",
        target_width: 854,
        target_height: 480,
        bitrate: "800k",
    },
    QualityProfile {
        label: "360p",
        target_width: 640,
        target_height: 360,
        bitrate: "500k",
    },
];

/// Whether an action produces a preview or the final artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessingMode {
    Preview,
    Final,
}

/// Everything the argument builder needs, captured when an action fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingRequest {
    pub marks: TrimMarks,
    pub muted: bool,
    pub quality: QualityProfile,
    pub mode: ProcessingMode,
}

impl ProcessingRequest {
    pub fn fingerprint(&self) -> RequestFingerprint {
        RequestFingerprint {
            start_seconds: self.marks.start_seconds,
            end_seconds: self.marks.end_seconds,
            muted: self.muted,
            quality_label: self.quality.label,
        }
    }
}

/// Value-equality key deciding whether a cached preview is still valid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestFingerprint {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub muted: bool,
    pub quality_label: &'static str,
}

/// Cached preview output
#[derive(Debug, Clone)]
pub struct PreviewArtifact {
    pub fingerprint: RequestFingerprint,
    pub buffer: Arc<[u8]>,
}

/// One decoded preview image of the thumbnail strip
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    /// Zero-based slot in the requested strip
    pub index: usize,
    pub bytes: Arc<[u8]>,
}

/// Evenly spaced preview images for one clip
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailSet {
    pub clip: ClipHandle,
    pub requested: usize,
    pub images: Vec<Thumbnail>,
}

impl ThumbnailSet {
    pub fn empty(clip: ClipHandle, requested: usize) -> Self {
        Self {
            clip,
            requested,
            images: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Fewer images than requested were readable
    pub fn is_partial(&self) -> bool {
        self.images.len() < self.requested
    }
}
