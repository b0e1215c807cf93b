// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_download;
pub mod memory_engine;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_notify;

// Re-export adapters
pub use exec_ffmpeg::FfmpegProcessAdapter;
pub use fs_download::FsDownloadAdapter;
pub use memory_engine::{ExecBehavior, MemoryEngineAdapter};
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::{AppConfig, TomlConfigAdapter};
pub use tracing_notify::{TracingNotifyAdapter, TracingPlaybackAdapter};
