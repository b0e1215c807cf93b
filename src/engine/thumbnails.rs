//! Thumbnail strip generation
//!
//! One engine invocation samples the clip at `count / duration` frames per
//! second and writes a numbered image sequence. Unreadable images are
//! skipped, so a short strip is a valid result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{ClipSource, Thumbnail, ThumbnailSet};
use crate::engine::{BufferNames, EngineClient};

/// JPEG quality scale passed to the engine (2 is near-best)
const THUMBNAIL_QSCALE: &str = "2";

/// Size and count of the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSpec {
    pub count: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            count: 10,
            width: 120,
            height: 68,
        }
    }
}

/// Generates the preview strip for a clip
pub struct ThumbnailGenerator {
    engine: Arc<EngineClient>,
    names: BufferNames,
}

impl ThumbnailGenerator {
    pub fn new(engine: Arc<EngineClient>, names: BufferNames) -> Self {
        Self { engine, names }
    }

    /// Sampling rate that yields `count` frames over `duration`
    pub fn sampling_rate(count: usize, duration: f64) -> f64 {
        count as f64 / duration
    }

    /// Engine arguments for one strip
    pub fn build_args(&self, spec: &ThumbnailSpec, duration: f64) -> Vec<String> {
        let fps = Self::sampling_rate(spec.count, duration);
        vec![
            "-i".to_string(),
            self.names.input(),
            "-vf".to_string(),
            format!("fps={},scale={}:{}", fps, spec.width, spec.height),
            "-q:v".to_string(),
            THUMBNAIL_QSCALE.to_string(),
            self.names.thumbnail_pattern(),
        ]
    }

    /// Stage the clip, run the engine once and collect whatever images exist
    pub async fn generate(
        &self,
        clip: &ClipSource,
        spec: &ThumbnailSpec,
        duration: f64,
    ) -> Result<ThumbnailSet, DomainError> {
        if spec.count == 0 || !duration.is_finite() || duration <= 0.0 {
            warn!(
                clip = %clip.handle,
                count = spec.count,
                duration,
                "Nothing to sample for thumbnails"
            );
            return Ok(ThumbnailSet::empty(clip.handle, spec.count));
        }

        info!(
            clip = %clip.handle,
            count = spec.count,
            duration,
            "Generating thumbnails"
        );
        self.engine.write_input(&self.names.input(), &clip.bytes).await?;
        for sequence in 1..=spec.count {
            self.engine.clear_output(&self.names.thumbnail(sequence)).await?;
        }
        self.engine.execute(&self.build_args(spec, duration)).await?;

        let mut images = Vec::with_capacity(spec.count);
        for sequence in 1..=spec.count {
            let name = self.names.thumbnail(sequence);
            match self.engine.read_output(&name).await {
                Ok(bytes) => images.push(Thumbnail {
                    index: sequence - 1,
                    bytes: Arc::from(bytes),
                }),
                Err(err) => warn!(name = %name, error = %err, "Could not read thumbnail"),
            }
        }

        if images.is_empty() {
            warn!(clip = %clip.handle, "Engine produced no readable thumbnails");
        } else {
            info!(
                clip = %clip.handle,
                loaded = images.len(),
                requested = spec.count,
                "Thumbnails loaded"
            );
        }

        Ok(ThumbnailSet {
            clip: clip.handle,
            requested: spec.count,
            images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ExecBehavior, MemoryEngineAdapter};

    async fn ready_engine(adapter: Arc<MemoryEngineAdapter>) -> Arc<EngineClient> {
        let engine = Arc::new(EngineClient::new(adapter));
        engine.load().await.unwrap();
        engine
    }

    fn clip() -> ClipSource {
        ClipSource::new("clip.mp4", "video/mp4", vec![0u8; 16])
    }

    #[test]
    fn test_sampling_rate() {
        assert_eq!(ThumbnailGenerator::sampling_rate(10, 100.0), 0.1);
        assert_eq!(ThumbnailGenerator::sampling_rate(10, 5.0), 2.0);
    }

    #[tokio::test]
    async fn test_build_args() {
        let engine = ready_engine(Arc::new(MemoryEngineAdapter::new())).await;
        let generator = ThumbnailGenerator::new(engine, BufferNames::default());
        let args = generator.build_args(&ThumbnailSpec::default(), 100.0);
        assert_eq!(
            args,
            vec![
                "-i",
                "input.mp4",
                "-vf",
                "fps=0.1,scale=120:68",
                "-q:v",
                "2",
                "thumb_%03d.jpg"
            ]
        );
    }

    #[tokio::test]
    async fn test_partial_output_is_not_an_error() {
        let adapter = Arc::new(MemoryEngineAdapter::producing_thumbnails(&[1, 2, 4, 5, 7, 9, 10]));
        let engine = ready_engine(adapter.clone()).await;
        let generator = ThumbnailGenerator::new(engine.clone(), BufferNames::default());

        let set = generator
            .generate(&clip(), &ThumbnailSpec::default(), 100.0)
            .await
            .unwrap();

        assert_eq!(set.len(), 7);
        assert!(set.is_partial());
        let indices: Vec<usize> = set.images.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 3, 4, 6, 8, 9]);
        assert_eq!(engine.execution_count(), 1);
    }

    #[tokio::test]
    async fn test_earlier_strip_is_not_reused() {
        let adapter = Arc::new(MemoryEngineAdapter::producing_thumbnails(&(1..=10).collect::<Vec<_>>()));
        let engine = ready_engine(adapter.clone()).await;
        let generator = ThumbnailGenerator::new(engine, BufferNames::default());
        let first = generator
            .generate(&clip(), &ThumbnailSpec::default(), 100.0)
            .await
            .unwrap();
        assert_eq!(first.len(), 10);

        adapter.set_behavior(ExecBehavior::Echo {
            thumbnails: vec![1, 2],
        });
        let second = generator
            .generate(&clip(), &ThumbnailSpec::default(), 40.0)
            .await
            .unwrap();
        assert_eq!(second.len(), 2);
        assert!(second.is_partial());
        assert!(adapter.file("thumb_003.jpg").is_none());
    }

    #[tokio::test]
    async fn test_no_outputs_yields_empty_set() {
        let adapter = Arc::new(MemoryEngineAdapter::new());
        let engine = ready_engine(adapter).await;
        let generator = ThumbnailGenerator::new(engine, BufferNames::default());
        let set = generator
            .generate(&clip(), &ThumbnailSpec::default(), 30.0)
            .await
            .unwrap();
        assert!(set.is_empty());
        assert_eq!(set.requested, 10);
    }

    #[tokio::test]
    async fn test_zero_count_skips_engine() {
        let engine = ready_engine(Arc::new(MemoryEngineAdapter::new())).await;
        let generator = ThumbnailGenerator::new(engine.clone(), BufferNames::default());
        let spec = ThumbnailSpec {
            count: 0,
            ..ThumbnailSpec::default()
        };
        let set = generator.generate(&clip(), &spec, 30.0).await.unwrap();
        assert!(set.is_empty());
        assert_eq!(engine.execution_count(), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_propagates() {
        let adapter = Arc::new(MemoryEngineAdapter::failing_exec(1, "moov atom not found"));
        let engine = ready_engine(adapter).await;
        let generator = ThumbnailGenerator::new(engine, BufferNames::default());
        let err = generator
            .generate(&clip(), &ThumbnailSpec::default(), 30.0)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EngineExecution { .. }));
    }
}
