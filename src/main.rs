//! Trimmify video trimmer
//!
//! Trims a clip between two marks, renders previews, and extracts thumbnail
//! strips, with ffmpeg as the media engine.
//!
//! # Usage
//!
//! ```bash
//! trimmify trim --input holiday.mp4 --start 00:01:00 --end 00:02:00 --mute
//! trimmify trim --input holiday.mp4 --start 1:00 --end 1:30 --quality 720p --preview
//! trimmify thumbs --input holiday.mp4 --count 8
//! trimmify timecode 1:02:03
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use trimmify::cli::{commands, Cli, Commands};
use trimmify::config_initialization::initialize_configuration_hierarchy;
use trimmify::utils::logging::{init_logging, LogFormat};

/// Main entry point for the Trimmify CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli).context("Failed to load configuration")?;
    let format: LogFormat = config
        .log_format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    init_logging(&config.log_level, format);

    info!("Starting Trimmify");
    if let Some(path) = &config.source {
        info!(path = %path.display(), "Loaded configuration file");
    }

    match cli.command {
        Commands::Trim(args) => commands::trim(config, args).await?,
        Commands::Thumbs(args) => commands::thumbs(config, args).await?,
        Commands::Timecode(args) => commands::timecode(args)?,
        Commands::Qualities(args) => commands::qualities(args)?,
    }

    info!("Trimmify completed successfully");
    Ok(())
}
