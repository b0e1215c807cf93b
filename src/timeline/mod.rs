//! Timeline interaction state machine
//!
//! Turns pointer input on the timeline and the progress scrubber into mark
//! changes and seeks. [`TimelineState::apply`] is a pure transition: it never
//! mutates its receiver and reports at most one [`TimelineEffect`] per event.
//!
//! The start handle may move within `[0, end - MIN_TRIM_DURATION]` and the end
//! handle within `[start + MIN_TRIM_DURATION, duration]`, so the minimum trim
//! length holds after every move.

use serde::Serialize;

use crate::domain::model::TrimMarks;
use crate::utils::time::TimeCodec;

/// What the pointer is currently dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DragState {
    #[default]
    Idle,
    DraggingStart,
    DraggingEnd,
    DraggingPlayhead,
    /// Dragging the thumb of the progress scrubber
    DraggingThumb,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        *self != DragState::Idle
    }
}

/// Element a pointer-down landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    StartHandle,
    EndHandle,
    Playhead,
    Scrubber,
}

/// Pointer input, with `x` measured in pixels from the left edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { target: PointerTarget, x: f64 },
    Move { x: f64 },
    Up,
    /// Press and release on the timeline body without dragging
    Click { x: f64 },
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineEffect {
    MarksChanged(TrimMarks),
    Seek(f64),
}

/// Pixel/time mapping of a horizontal track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineGeometry {
    pub width_px: f64,
    pub duration: f64,
}

impl TimelineGeometry {
    pub fn new(width_px: f64, duration: f64) -> Self {
        Self { width_px, duration }
    }

    fn is_degenerate(&self) -> bool {
        !(self.width_px > 0.0 && self.duration > 0.0)
    }

    /// Time under pixel `x`, clamped to `[0, duration]`; 0 for a degenerate track
    pub fn pixel_to_time(&self, x: f64) -> f64 {
        if self.is_degenerate() || !x.is_finite() {
            return 0.0;
        }
        (x * self.duration / self.width_px).clamp(0.0, self.duration)
    }

    /// Pixel offset of time `t`, clamped to the track
    pub fn time_to_pixel(&self, t: f64) -> f64 {
        if self.is_degenerate() || !t.is_finite() {
            return 0.0;
        }
        (t * self.width_px / self.duration).clamp(0.0, self.width_px)
    }

    /// `segments + 1` evenly spaced `HH:MM:SS` labels from 0 to the duration
    pub fn tick_labels(&self, segments: usize) -> Vec<String> {
        if segments == 0 {
            return Vec::new();
        }
        let duration = self.duration.max(0.0);
        (0..=segments)
            .map(|i| TimeCodec::format(duration * i as f64 / segments as f64))
            .collect()
    }
}

/// Result of applying one pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: TimelineState,
    pub effect: Option<TimelineEffect>,
}

/// Drag state, current marks and geometry of the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineState {
    pub drag: DragState,
    pub marks: TrimMarks,
    pub geometry: TimelineGeometry,
}

impl TimelineState {
    pub fn new(marks: TrimMarks, geometry: TimelineGeometry) -> Self {
        Self {
            drag: DragState::Idle,
            marks,
            geometry,
        }
    }

    pub fn with_marks(self, marks: TrimMarks) -> Self {
        Self { marks, ..self }
    }

    pub fn with_width(self, width_px: f64) -> Self {
        Self {
            geometry: TimelineGeometry::new(width_px, self.geometry.duration),
            ..self
        }
    }

    /// Apply a pointer event, returning the next state and any effect
    pub fn apply(&self, event: PointerEvent) -> Transition {
        match event {
            PointerEvent::Down { target, x } => self.pointer_down(target, x),
            PointerEvent::Move { x } => self.pointer_move(x),
            PointerEvent::Up => self.enter(DragState::Idle, None),
            PointerEvent::Click { x } => match self.drag {
                DragState::Idle => {
                    self.enter(DragState::Idle, Some(TimelineEffect::Seek(self.seek_time(x))))
                }
                _ => self.unchanged(),
            },
        }
    }

    fn pointer_down(&self, target: PointerTarget, x: f64) -> Transition {
        if self.drag.is_dragging() {
            return self.unchanged();
        }
        match target {
            PointerTarget::StartHandle => self.enter(DragState::DraggingStart, None),
            PointerTarget::EndHandle => self.enter(DragState::DraggingEnd, None),
            PointerTarget::Playhead => self.enter(DragState::DraggingPlayhead, None),
            PointerTarget::Scrubber => self.enter(
                DragState::DraggingThumb,
                Some(TimelineEffect::Seek(self.seek_time(x))),
            ),
        }
    }

    fn pointer_move(&self, x: f64) -> Transition {
        let t = self.geometry.pixel_to_time(x);
        let duration = self.geometry.duration;
        let marks = match self.drag {
            DragState::Idle => return self.unchanged(),
            DragState::DraggingPlayhead | DragState::DraggingThumb => {
                return self.enter(self.drag, Some(TimelineEffect::Seek(t)));
            }
            DragState::DraggingStart => {
                let start = t.clamp(0.0, self.marks.latest_start());
                TrimMarks::new(start, self.marks.end_seconds, duration)
            }
            DragState::DraggingEnd => {
                let end = t.clamp(self.marks.earliest_end(duration), duration);
                TrimMarks::new(self.marks.start_seconds, end, duration)
            }
        };
        match marks {
            Ok(marks) if marks != self.marks => Transition {
                state: self.with_marks(marks),
                effect: Some(TimelineEffect::MarksChanged(marks)),
            },
            _ => self.unchanged(),
        }
    }

    fn seek_time(&self, x: f64) -> f64 {
        self.geometry.pixel_to_time(x)
    }

    fn enter(&self, drag: DragState, effect: Option<TimelineEffect>) -> Transition {
        Transition {
            state: Self { drag, ..*self },
            effect,
        }
    }

    fn unchanged(&self) -> Transition {
        Transition {
            state: *self,
            effect: None,
        }
    }
}
