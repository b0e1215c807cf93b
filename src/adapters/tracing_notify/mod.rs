// Tracing notify adapter - User-facing surfaces rendered through tracing

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, warn};

use crate::ports::*;

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reports notices as log events and keeps them for later inspection
#[derive(Default)]
pub struct TracingNotifyAdapter {
    notices: Mutex<Vec<UserNotice>>,
}

impl TracingNotifyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice raised so far, oldest first
    pub fn notices(&self) -> Vec<UserNotice> {
        locked(&self.notices).clone()
    }
}

impl NotifyPort for TracingNotifyAdapter {
    fn notify(&self, notice: UserNotice) {
        let detail = notice.detail.as_deref().unwrap_or("");
        match notice.severity {
            NoticeSeverity::Fatal => error!(detail, "{}", notice.message),
            NoticeSeverity::Transient => warn!(detail, "{}", notice.message),
        }
        locked(&self.notices).push(notice);
    }
}

/// Headless playback surface
///
/// Tracks the play position and the last presented preview. When a preview
/// path is configured each presented preview is also written there.
#[derive(Default)]
pub struct TracingPlaybackAdapter {
    preview_path: Option<PathBuf>,
    position: Mutex<f64>,
    current: Mutex<Option<Arc<[u8]>>>,
    presented: Mutex<usize>,
}

impl TracingPlaybackAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write each presented preview to `path`
    pub fn writing_previews_to(path: impl Into<PathBuf>) -> Self {
        Self {
            preview_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn position(&self) -> f64 {
        *locked(&self.position)
    }

    pub fn current_preview(&self) -> Option<Arc<[u8]>> {
        locked(&self.current).clone()
    }

    /// How many times a preview was shown, cached or fresh
    pub fn presented_count(&self) -> usize {
        *locked(&self.presented)
    }
}

impl PlaybackPort for TracingPlaybackAdapter {
    fn seek(&self, seconds: f64) {
        *locked(&self.position) = seconds;
        info!(seconds, "Playback seek");
    }

    fn present_preview(&self, buffer: &[u8]) {
        *locked(&self.current) = Some(Arc::from(buffer));
        *locked(&self.presented) += 1;
        *locked(&self.position) = 0.0;
        info!(size = buffer.len(), "Presenting preview");

        if let Some(path) = &self.preview_path {
            match std::fs::write(path, buffer) {
                Ok(()) => info!(path = %path.display(), "Preview written"),
                Err(e) => error!(path = %path.display(), error = %e, "Failed to write preview"),
            }
        }
    }
}
