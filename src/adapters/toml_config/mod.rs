// TOML config adapter - Application configuration from TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::rules::{UploadPolicy, DEFAULT_MAX_UPLOAD_BYTES};
use crate::engine::{BufferNames, ThumbnailSpec};
use crate::error::{TrimmifyError, TrimmifyResult};

/// Log levels accepted in configuration
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log output formats accepted in configuration
pub const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Files tried, in order, when no explicit path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["trimmify.toml", "config/trimmify.toml"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Extension of the staged source and engine outputs
    pub container_ext: String,
    /// Extension of thumbnail images
    pub thumbnail_ext: String,
    pub thumbnail_count: usize,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub max_upload_bytes: u64,
    /// Where downloads and previews are written
    pub output_dir: PathBuf,
    pub log_level: String,
    pub log_format: String,
    /// File the values were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            container_ext: "mp4".to_string(),
            thumbnail_ext: "jpg".to_string(),
            thumbnail_count: 10,
            thumbnail_width: 120,
            thumbnail_height: 68,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            output_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            source: None,
        }
    }
}

impl AppConfig {
    pub fn buffer_names(&self) -> BufferNames {
        BufferNames::new(self.container_ext.clone(), self.thumbnail_ext.clone())
    }

    pub fn thumbnail_spec(&self) -> ThumbnailSpec {
        ThumbnailSpec {
            count: self.thumbnail_count,
            width: self.thumbnail_width,
            height: self.thumbnail_height,
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::with_max_bytes(self.max_upload_bytes)
    }

    /// Reject values the rest of the crate cannot work with
    pub fn validate(&self) -> TrimmifyResult<()> {
        if self.ffmpeg_path.trim().is_empty() || self.ffprobe_path.trim().is_empty() {
            return Err(TrimmifyError::invalid_config("Engine paths cannot be empty"));
        }
        for (key, ext) in [
            ("container_ext", &self.container_ext),
            ("thumbnail_ext", &self.thumbnail_ext),
        ] {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                return Err(TrimmifyError::invalid_config(format!(
                    "{} must be a bare extension, got '{}'",
                    key, ext
                )));
            }
        }
        if self.thumbnail_count == 0 || self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(TrimmifyError::invalid_config(
                "Thumbnail count and size must be non-zero",
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(TrimmifyError::invalid_config("max_upload_bytes must be non-zero"));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(TrimmifyError::invalid_config(format!(
                "Unknown log level '{}'",
                self.log_level
            )));
        }
        if !LOG_FORMATS.contains(&self.log_format.to_ascii_lowercase().as_str()) {
            return Err(TrimmifyError::invalid_config(format!(
                "Unknown log format '{}'",
                self.log_format
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    trimmify: Option<AppConfig>,
}

/// Loads `AppConfig` from the `[trimmify]` table of a TOML file
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse TOML text; a missing `[trimmify]` table yields the defaults
    pub fn parse(content: &str, origin: &str) -> TrimmifyResult<AppConfig> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| TrimmifyError::ConfigParse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        Ok(file.trimmify.unwrap_or_default())
    }

    /// Load and parse a config file
    pub fn load(path: &Path) -> TrimmifyResult<AppConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// First existing default config file, if any
    pub fn discover() -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
            .inspect(|path| debug!(path = %path.display(), "Found configuration file"))
    }

    /// Serialize a config under the `[trimmify]` table
    pub fn render(config: &AppConfig) -> TrimmifyResult<String> {
        let mut table = toml::Table::new();
        let value = toml::Value::try_from(config)
            .map_err(|e| TrimmifyError::invalid_config(e.to_string()))?;
        table.insert("trimmify".to_string(), value);
        toml::to_string_pretty(&table).map_err(|e| TrimmifyError::invalid_config(e.to_string()))
    }
}
