//! Media engine module
//!
//! Everything that talks to the external engine lives here: the lifecycle
//! client, the argument builder and the thumbnail generator. The engine's
//! namespace uses a handful of fixed buffer names, defined once in
//! [`BufferNames`].

use serde::{Deserialize, Serialize};

use crate::domain::model::ProcessingMode;

pub mod args;
pub mod client;
pub mod thumbnails;

pub use args::ArgumentBuilder;
pub use client::{EngineClient, EngineState};
pub use thumbnails::{ThumbnailGenerator, ThumbnailSpec};

/// Fixed buffer names in the engine namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferNames {
    /// Extension of the staged source and of preview/final outputs
    pub container_ext: String,
    /// Extension of numbered thumbnail images
    pub image_ext: String,
}

impl Default for BufferNames {
    fn default() -> Self {
        Self {
            container_ext: "mp4".to_string(),
            image_ext: "jpg".to_string(),
        }
    }
}

impl BufferNames {
    pub fn new(container_ext: impl Into<String>, image_ext: impl Into<String>) -> Self {
        Self {
            container_ext: container_ext.into(),
            image_ext: image_ext.into(),
        }
    }

    /// `input.<ext>`
    pub fn input(&self) -> String {
        format!("input.{}", self.container_ext)
    }

    /// `preview.<ext>` or `output.<ext>`; one name per mode
    pub fn output(&self, mode: ProcessingMode) -> String {
        match mode {
            ProcessingMode::Preview => format!("preview.{}", self.container_ext),
            ProcessingMode::Final => format!("output.{}", self.container_ext),
        }
    }

    /// Engine-side pattern for the numbered thumbnail sequence
    pub fn thumbnail_pattern(&self) -> String {
        format!("thumb_%03d.{}", self.image_ext)
    }

    /// `thumb_<NNN>.<ext>` for a one-based sequence number
    pub fn thumbnail(&self, sequence: usize) -> String {
        format!("thumb_{:03}.{}", sequence, self.image_ext)
    }
}
