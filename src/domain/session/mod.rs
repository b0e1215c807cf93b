// Domain session - Per-clip trim session state and its reducer

use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::timeline::{
    DragState, PointerEvent, TimelineEffect, TimelineGeometry, TimelineState,
};
use crate::utils::time::TimeCodec;

/// Timeline width used until the surface reports its real size
pub const DEFAULT_TIMELINE_WIDTH_PX: f64 = 1000.0;

/// User input and playback events that change a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Pointer(PointerEvent),
    /// Text typed into the start or end field
    EditMark { field: MarkField, text: String },
    SetMuted(bool),
    SetQuality(QualityProfile),
    /// Playback progressed to this position
    TimeUpdate(f64),
    ResizeTimeline(f64),
    ClearPreview,
}

/// Side effect the owner of the session must carry out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEffect {
    /// Move the playback position
    Seek(f64),
    /// Marks moved; any cached preview was dropped
    MarksChanged(TrimMarks),
}

/// Everything one trim session knows about its clip
#[derive(Debug, Clone)]
pub struct SessionState {
    pub clip: ClipHandle,
    /// Whole seconds
    pub clip_duration: f64,
    pub timeline: TimelineState,
    pub playhead: f64,
    pub muted: bool,
    pub quality: QualityProfile,
    pub preview: Option<PreviewArtifact>,
    pub thumbnails: Option<ThumbnailSet>,
}

impl SessionState {
    /// Fresh session with marks spanning the whole clip
    pub fn new(clip: ClipHandle, clip_duration: f64) -> Result<Self, DomainError> {
        let marks = TrimMarks::full(clip_duration)?;
        Ok(Self {
            clip,
            clip_duration,
            timeline: TimelineState::new(
                marks,
                TimelineGeometry::new(DEFAULT_TIMELINE_WIDTH_PX, clip_duration),
            ),
            playhead: 0.0,
            muted: false,
            quality: QualityProfile::ORIGINAL,
            preview: None,
            thumbnails: None,
        })
    }

    pub fn marks(&self) -> TrimMarks {
        self.timeline.marks
    }

    pub fn drag(&self) -> DragState {
        self.timeline.drag
    }

    /// Request for `mode` built from the current marks and settings
    pub fn request(&self, mode: ProcessingMode) -> ProcessingRequest {
        ProcessingRequest {
            marks: self.marks(),
            muted: self.muted,
            quality: self.quality,
            mode,
        }
    }

    /// Cached preview buffer if it was produced for exactly this fingerprint
    pub fn cached_preview(&self, fingerprint: &RequestFingerprint) -> Option<Arc<[u8]>> {
        self.preview
            .as_ref()
            .filter(|artifact| artifact.fingerprint == *fingerprint)
            .map(|artifact| Arc::clone(&artifact.buffer))
    }

    /// Apply one event; validation failures leave the state as it was
    pub fn reduce(
        &self,
        event: SessionEvent,
    ) -> Result<(SessionState, Option<SessionEffect>), DomainError> {
        let mut next = self.clone();
        let effect = match event {
            SessionEvent::Pointer(pointer) => {
                let transition = self.timeline.apply(pointer);
                next.timeline = transition.state;
                match transition.effect {
                    Some(TimelineEffect::MarksChanged(marks)) => {
                        next.preview = None;
                        Some(SessionEffect::MarksChanged(marks))
                    }
                    Some(TimelineEffect::Seek(seconds)) => {
                        next.playhead = seconds;
                        Some(SessionEffect::Seek(seconds))
                    }
                    None => None,
                }
            }
            SessionEvent::EditMark { field, text } => {
                let marks = self.edited_marks(field, &text)?;
                if marks == self.marks() {
                    None
                } else {
                    next.timeline = self.timeline.with_marks(marks);
                    next.preview = None;
                    Some(SessionEffect::MarksChanged(marks))
                }
            }
            SessionEvent::SetMuted(muted) => {
                if muted != self.muted {
                    next.muted = muted;
                    next.preview = None;
                }
                None
            }
            SessionEvent::SetQuality(quality) => {
                if quality != self.quality {
                    next.quality = quality;
                    next.preview = None;
                }
                None
            }
            SessionEvent::TimeUpdate(seconds) => {
                if seconds.is_finite() {
                    next.playhead = seconds.clamp(0.0, self.clip_duration);
                }
                None
            }
            SessionEvent::ResizeTimeline(width_px) => {
                next.timeline = self.timeline.with_width(width_px);
                None
            }
            SessionEvent::ClearPreview => {
                next.preview = None;
                None
            }
        };
        if self.preview.is_some() && next.preview.is_none() {
            debug!(clip = %self.clip, "Cached preview invalidated");
        }
        Ok((next, effect))
    }

    fn edited_marks(&self, field: MarkField, text: &str) -> Result<TrimMarks, DomainError> {
        let seconds = TimeCodec::parse(text)?;
        let current = self.marks();
        match field {
            MarkField::Start => TrimMarks::new(seconds, current.end_seconds, self.clip_duration),
            MarkField::End => TrimMarks::new(current.start_seconds, seconds, self.clip_duration),
        }
    }
}
