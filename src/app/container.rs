use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::adapters::{
    AppConfig, FfmpegProcessAdapter, FfprobeAdapter, FsDownloadAdapter, TracingNotifyAdapter,
    TracingPlaybackAdapter,
};
use crate::app::{SessionPorts, TrimInteractor, UploadInteractor};
use crate::domain::errors::DomainError;
use crate::domain::model::ClipSource;
use crate::engine::EngineClient;
use crate::ports::{DownloadPort, EnginePort, NotifyPort, PlaybackPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn upload_interactor(&self) -> Arc<UploadInteractor>;
    fn engine(&self) -> Arc<EngineClient>;
}

/// Wires adapters into interactors
///
/// One engine client is shared by every session the container opens.
pub struct DefaultAppContainer {
    config: AppConfig,
    engine: Arc<EngineClient>,
    probe_port: Arc<dyn ProbePort>,
    ports: SessionPorts,
    upload_interactor: Arc<UploadInteractor>,
}

impl DefaultAppContainer {
    /// Production wiring: ffmpeg/ffprobe processes and the filesystem
    pub fn new(config: AppConfig, playback: Arc<dyn PlaybackPort>) -> Self {
        let engine_port = Arc::new(FfmpegProcessAdapter::new(&config.ffmpeg_path));
        let probe_port = Arc::new(FfprobeAdapter::new(&config.ffprobe_path));
        let download_port = Arc::new(FsDownloadAdapter::new(&config.output_dir));
        let notify_port = Arc::new(TracingNotifyAdapter::new());

        Self::with_ports(
            config,
            engine_port,
            probe_port,
            download_port,
            playback,
            notify_port,
        )
    }

    /// Wiring over caller-supplied ports
    pub fn with_ports(
        config: AppConfig,
        engine_port: Arc<dyn EnginePort>,
        probe_port: Arc<dyn ProbePort>,
        download_port: Arc<dyn DownloadPort>,
        playback_port: Arc<dyn PlaybackPort>,
        notify_port: Arc<dyn NotifyPort>,
    ) -> Self {
        let upload_interactor = Arc::new(UploadInteractor::new(config.upload_policy()));
        Self {
            engine: Arc::new(EngineClient::new(engine_port)),
            probe_port,
            ports: SessionPorts {
                playback: playback_port,
                download: download_port,
                notify: notify_port,
            },
            upload_interactor,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Probe the file behind `source` and start a session for it
    pub async fn open_session(
        &self,
        source: ClipSource,
        path: &Path,
    ) -> Result<Arc<TrimInteractor>, DomainError> {
        let duration = self
            .probe_port
            .probe_duration(&path.to_string_lossy())
            .await?;
        info!(file = %path.display(), duration, "Probed source");
        self.open_session_with_duration(source, duration)
    }

    /// Start a session for a clip whose duration is already known
    pub fn open_session_with_duration(
        &self,
        source: ClipSource,
        duration: f64,
    ) -> Result<Arc<TrimInteractor>, DomainError> {
        let interactor = TrimInteractor::new(
            source,
            duration,
            Arc::clone(&self.engine),
            self.config.buffer_names(),
            self.config.thumbnail_spec(),
            self.ports.clone(),
        )?;
        Ok(Arc::new(interactor))
    }
}

impl AppContainer for DefaultAppContainer {
    fn upload_interactor(&self) -> Arc<UploadInteractor> {
        Arc::clone(&self.upload_interactor)
    }

    fn engine(&self) -> Arc<EngineClient> {
        Arc::clone(&self.engine)
    }
}

impl Default for DefaultAppContainer {
    fn default() -> Self {
        Self::new(AppConfig::default(), Arc::new(TracingPlaybackAdapter::new()))
    }
}
