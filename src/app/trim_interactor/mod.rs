// Trim interactor - Orchestrates one trim/preview session

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, instrument};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::domain::session::*;
use crate::engine::{ArgumentBuilder, BufferNames, EngineClient, ThumbnailGenerator, ThumbnailSpec};
use crate::ports::*;

/// Collaborators a session reports to
#[derive(Clone)]
pub struct SessionPorts {
    pub playback: Arc<dyn PlaybackPort>,
    pub download: Arc<dyn DownloadPort>,
    pub notify: Arc<dyn NotifyPort>,
}

/// What a successful action produced
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Cached preview shown again without running the engine
    PreviewReused(Arc<[u8]>),
    /// Fresh preview rendered, cached and shown
    PreviewRendered(Arc<[u8]>),
    /// Final artifact handed to the download sink
    Delivered { file_name: String, location: String },
}

/// Holds the processing flag for the duration of one action
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, DomainError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DomainError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Interactor for one clip's trim session
///
/// Owns the session state, the processing flag and the only path by which
/// engine failures reach the user.
pub struct TrimInteractor {
    source: ClipSource,
    engine: Arc<EngineClient>,
    builder: ArgumentBuilder,
    thumbnails: ThumbnailGenerator,
    thumbnail_spec: ThumbnailSpec,
    ports: SessionPorts,
    state: Mutex<SessionState>,
    processing: AtomicBool,
}

impl TrimInteractor {
    /// Start a session for `source`; `clip_duration` is the probed duration
    pub fn new(
        source: ClipSource,
        clip_duration: f64,
        engine: Arc<EngineClient>,
        names: BufferNames,
        thumbnail_spec: ThumbnailSpec,
        ports: SessionPorts,
    ) -> Result<Self, DomainError> {
        let duration = ClipDurationRule::normalize(clip_duration)?;
        let state = SessionState::new(source.handle, duration)?;
        info!(
            clip = %source.handle,
            file = %source.file_name,
            duration,
            "Trim session started"
        );
        Ok(Self {
            builder: ArgumentBuilder::new(names.clone()),
            thumbnails: ThumbnailGenerator::new(Arc::clone(&engine), names),
            source,
            engine,
            thumbnail_spec,
            ports,
            state: Mutex::new(state),
            processing: AtomicBool::new(false),
        })
    }

    fn locked(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn source(&self) -> &ClipSource {
        &self.source
    }

    /// Snapshot of the session state
    pub fn state(&self) -> SessionState {
        self.locked().clone()
    }

    pub fn marks(&self) -> TrimMarks {
        self.locked().marks()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Feed one event through the session reducer and carry out its effect
    pub fn dispatch(&self, event: SessionEvent) -> Result<Option<SessionEffect>, DomainError> {
        let effect = {
            let mut state = self.locked();
            let (next, effect) = state.reduce(event)?;
            *state = next;
            effect
        };
        if let Some(SessionEffect::Seek(seconds)) = effect {
            self.ports.playback.seek(seconds);
        }
        Ok(effect)
    }

    /// Apply text typed into the start or end field
    pub fn edit_mark(&self, field: MarkField, text: &str) -> Result<TrimMarks, DomainError> {
        self.dispatch(SessionEvent::EditMark {
            field,
            text: text.to_string(),
        })?;
        Ok(self.marks())
    }

    pub fn set_muted(&self, muted: bool) -> Result<(), DomainError> {
        self.dispatch(SessionEvent::SetMuted(muted)).map(|_| ())
    }

    pub fn set_quality(&self, quality: QualityProfile) -> Result<(), DomainError> {
        self.dispatch(SessionEvent::SetQuality(quality)).map(|_| ())
    }

    pub async fn preview(&self) -> Result<ActionOutcome, DomainError> {
        self.run_action(ProcessingMode::Preview).await
    }

    pub async fn download(&self) -> Result<ActionOutcome, DomainError> {
        self.run_action(ProcessingMode::Final).await
    }

    /// Run Preview or Download against the current marks and settings
    #[instrument(skip(self))]
    pub async fn run_action(&self, mode: ProcessingMode) -> Result<ActionOutcome, DomainError> {
        let _guard = ProcessingGuard::acquire(&self.processing)?;
        let request = self.locked().request(mode);
        let fingerprint = request.fingerprint();

        if mode == ProcessingMode::Preview {
            let cached = self.locked().cached_preview(&fingerprint);
            if let Some(buffer) = cached {
                debug!(marks = %request.marks, "Reusing cached preview");
                self.ports.playback.present_preview(&buffer);
                return Ok(ActionOutcome::PreviewReused(buffer));
            }
        }

        info!(
            clip = %self.source.handle,
            marks = %request.marks,
            muted = request.muted,
            quality = request.quality.label,
            "Processing"
        );
        let result = match self.render(&request).await {
            Ok(bytes) => self.complete(&request, bytes).await,
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            self.report(Self::failure_summary(mode), err);
        }
        result
    }

    async fn render(&self, request: &ProcessingRequest) -> Result<Vec<u8>, DomainError> {
        self.engine.load().await?;
        let names = self.builder.names();
        let output = names.output(request.mode);
        self.engine.write_input(&names.input(), &self.source.bytes).await?;
        self.engine.clear_output(&output).await?;
        self.engine.execute(&self.builder.build(request)).await?;
        self.engine.read_output(&output).await
    }

    async fn complete(
        &self,
        request: &ProcessingRequest,
        bytes: Vec<u8>,
    ) -> Result<ActionOutcome, DomainError> {
        match request.mode {
            ProcessingMode::Preview => {
                let buffer: Arc<[u8]> = Arc::from(bytes);
                self.locked().preview = Some(PreviewArtifact {
                    fingerprint: request.fingerprint(),
                    buffer: Arc::clone(&buffer),
                });
                self.ports.playback.present_preview(&buffer);
                info!(size = buffer.len(), "Preview ready");
                Ok(ActionOutcome::PreviewRendered(buffer))
            }
            ProcessingMode::Final => {
                let file_name = DownloadNaming::for_source(&self.source.file_name);
                let location = self.ports.download.deliver(&file_name, &bytes).await?;
                info!(file = %file_name, location = %location, "Download ready");
                Ok(ActionOutcome::Delivered { file_name, location })
            }
        }
    }

    /// Generate the thumbnail strip once per clip
    pub async fn ensure_thumbnails(&self) -> Result<ThumbnailSet, DomainError> {
        if let Some(set) = self.cached_thumbnails() {
            return Ok(set);
        }
        let _guard = ProcessingGuard::acquire(&self.processing)?;
        // Another caller may have finished while we waited for the flag
        if let Some(set) = self.cached_thumbnails() {
            return Ok(set);
        }

        let duration = self.locked().clip_duration;
        let generated = match self.engine.load().await {
            Ok(()) => {
                self.thumbnails
                    .generate(&self.source, &self.thumbnail_spec, duration)
                    .await
            }
            Err(err) => Err(err),
        };
        match generated {
            Ok(set) => {
                self.locked().thumbnails = Some(set.clone());
                Ok(set)
            }
            Err(err) => {
                self.report("Failed to generate thumbnails", &err);
                Err(err)
            }
        }
    }

    fn cached_thumbnails(&self) -> Option<ThumbnailSet> {
        self.locked()
            .thumbnails
            .as_ref()
            .filter(|set| set.clip == self.source.handle)
            .cloned()
    }

    fn failure_summary(mode: ProcessingMode) -> &'static str {
        match mode {
            ProcessingMode::Preview => "Failed to generate preview",
            ProcessingMode::Final => "Failed to process video",
        }
    }

    fn report(&self, summary: &str, err: &DomainError) {
        self.ports.notify.notify(UserNotice::from_error(summary, err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryEngineAdapter, TracingNotifyAdapter, TracingPlaybackAdapter};
    use async_trait::async_trait;

    struct NullDownload;

    #[async_trait]
    impl DownloadPort for NullDownload {
        async fn deliver(&self, file_name: &str, _bytes: &[u8]) -> Result<String, DomainError> {
            Ok(file_name.to_string())
        }
    }

    fn interactor(adapter: Arc<MemoryEngineAdapter>) -> (TrimInteractor, Arc<TracingNotifyAdapter>) {
        let notify = Arc::new(TracingNotifyAdapter::new());
        let ports = SessionPorts {
            playback: Arc::new(TracingPlaybackAdapter::new()),
            download: Arc::new(NullDownload),
            notify: notify.clone(),
        };
        let trim = TrimInteractor::new(
            ClipSource::new("clip.mp4", "video/mp4", vec![1, 2, 3]),
            30.9,
            Arc::new(EngineClient::new(adapter)),
            BufferNames::default(),
            ThumbnailSpec::default(),
            ports,
        )
        .unwrap();
        (trim, notify)
    }

    #[test]
    fn test_duration_is_floored() {
        let (trim, _) = interactor(Arc::new(MemoryEngineAdapter::new()));
        assert_eq!(trim.state().clip_duration, 30.0);
        assert_eq!(trim.marks().end_seconds, 30.0);
    }

    #[test]
    fn test_guard_releases_flag() {
        let flag = AtomicBool::new(false);
        {
            let _guard = ProcessingGuard::acquire(&flag).unwrap();
            assert!(flag.load(Ordering::Acquire));
            assert!(matches!(ProcessingGuard::acquire(&flag), Err(DomainError::Busy)));
        }
        assert!(!flag.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_preview_then_cache_hit() {
        let adapter = Arc::new(MemoryEngineAdapter::new());
        let (trim, _) = interactor(adapter.clone());
        assert!(matches!(trim.preview().await.unwrap(), ActionOutcome::PreviewRendered(_)));
        assert!(matches!(trim.preview().await.unwrap(), ActionOutcome::PreviewReused(_)));
        assert_eq!(adapter.exec_count(), 1);
        assert!(!trim.is_processing());
    }

    #[tokio::test]
    async fn test_failure_notifies_once() {
        let adapter = Arc::new(MemoryEngineAdapter::failing_exec(1, "Invalid data"));
        let (trim, notify) = interactor(adapter);
        let err = trim.download().await.unwrap_err();
        assert!(matches!(err, DomainError::EngineExecution { code: 1, .. }));
        let notices = notify.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to process video");
        assert!(!trim.is_processing());
    }

    #[tokio::test]
    async fn test_thumbnails_generated_once() {
        let adapter = Arc::new(MemoryEngineAdapter::producing_thumbnails(&[1, 2, 3]));
        let (trim, _) = interactor(adapter.clone());
        let first = trim.ensure_thumbnails().await.unwrap();
        let second = trim.ensure_thumbnails().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(adapter.exec_count(), 1);
    }
}
