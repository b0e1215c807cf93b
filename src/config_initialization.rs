//! Configuration initialization and hierarchy management

use tracing::debug;

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::error::{TrimmifyError, TrimmifyResult};

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "TRIMMIFY_";

/// Resolve configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> TrimmifyResult<AppConfig> {
    // Step 1 and 2: defaults, overlaid by a config file when one exists
    let mut config = match cli.config.clone().or_else(TomlConfigAdapter::discover) {
        Some(path) => AppConfig {
            source: Some(path.clone()),
            ..TomlConfigAdapter::load(&path)?
        },
        None => AppConfig::default(),
    };

    // Step 3: environment variables
    apply_environment_overrides(&mut config, |name| std::env::var(name).ok())?;

    // Step 4: CLI arguments
    apply_cli_overrides(&mut config, cli);

    config.validate()?;
    Ok(config)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> TrimmifyResult<T> {
    value.trim().parse().map_err(|_| TrimmifyError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Overlay `TRIMMIFY_*` variables read through `lookup`
pub fn apply_environment_overrides<F>(config: &mut AppConfig, lookup: F) -> TrimmifyResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let mut overrides = 0;
    let var = |key: &str| {
        let name = format!("{}{}", ENV_PREFIX, key);
        lookup(&name).map(|value| (name, value))
    };

    if let Some((_, value)) = var("FFMPEG_PATH") {
        config.ffmpeg_path = value;
        overrides += 1;
    }
    if let Some((_, value)) = var("FFPROBE_PATH") {
        config.ffprobe_path = value;
        overrides += 1;
    }
    if let Some((_, value)) = var("CONTAINER_EXT") {
        config.container_ext = value;
        overrides += 1;
    }
    if let Some((_, value)) = var("THUMBNAIL_EXT") {
        config.thumbnail_ext = value;
        overrides += 1;
    }
    if let Some((name, value)) = var("THUMBNAIL_COUNT") {
        config.thumbnail_count = parse_env(&name, &value)?;
        overrides += 1;
    }
    if let Some((name, value)) = var("THUMBNAIL_WIDTH") {
        config.thumbnail_width = parse_env(&name, &value)?;
        overrides += 1;
    }
    if let Some((name, value)) = var("THUMBNAIL_HEIGHT") {
        config.thumbnail_height = parse_env(&name, &value)?;
        overrides += 1;
    }
    if let Some((name, value)) = var("MAX_UPLOAD_BYTES") {
        config.max_upload_bytes = parse_env(&name, &value)?;
        overrides += 1;
    }
    if let Some((_, value)) = var("OUTPUT_DIR") {
        config.output_dir = value.into();
        overrides += 1;
    }
    if let Some((_, value)) = var("LOG_LEVEL") {
        config.log_level = value;
        overrides += 1;
    }
    if let Some((_, value)) = var("LOG_FORMAT") {
        config.log_format = value;
        overrides += 1;
    }

    if overrides > 0 {
        debug!(overrides, "Applied environment overrides");
    }
    Ok(())
}

/// Overlay global flags and command options that shadow configuration
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Commands::Thumbs(args) = &cli.command {
        if let Some(count) = args.count {
            config.thumbnail_count = count;
        }
    }
}
