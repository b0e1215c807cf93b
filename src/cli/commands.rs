//! Command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{AppConfig, TracingPlaybackAdapter};
use crate::app::{ActionOutcome, AppContainer, DefaultAppContainer};
use crate::cli::args::{QualitiesArgs, ThumbsArgs, TimecodeArgs, TrimArgs};
use crate::domain::model::{MarkField, QualityProfile, QUALITY_PROFILES};
use crate::utils::format_file_size;
use crate::utils::time::TimeCodec;

/// Where a CLI preview is written for a given source
fn preview_path(config: &AppConfig, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "video".to_string());
    config
        .output_dir
        .join(format!("preview-{}.{}", stem, config.container_ext))
}

/// Execute the trim command
pub async fn trim(config: AppConfig, args: TrimArgs) -> Result<()> {
    info!(input = %args.input.display(), start = %args.start, end = %args.end, "Starting trim");

    let quality = QualityProfile::by_label(&args.quality).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown quality '{}'. Available: {}",
            args.quality,
            QUALITY_PROFILES.map(|q| q.label).join(", ")
        )
    })?;

    let playback = Arc::new(TracingPlaybackAdapter::writing_previews_to(preview_path(
        &config,
        &args.input,
    )));
    let container = DefaultAppContainer::new(config, playback);

    let source = container
        .upload_interactor()
        .accept_path(&args.input)
        .await
        .with_context(|| format!("Cannot use {}", args.input.display()))?;
    let session = container
        .open_session(source, &args.input)
        .await
        .context("Failed to start trim session")?;

    session
        .edit_mark(MarkField::Start, &args.start)
        .context("Invalid start time")?;
    let marks = session
        .edit_mark(MarkField::End, &args.end)
        .context("Invalid end time")?;
    session.set_muted(args.mute)?;
    session.set_quality(quality)?;
    info!(%marks, muted = args.mute, quality = quality.label, "Marks set");

    let outcome = if args.preview {
        session.preview().await.context("Preview failed")?
    } else {
        session.download().await.context("Trim failed")?
    };

    match outcome {
        ActionOutcome::Delivered { location, .. } => println!("{}", location),
        ActionOutcome::PreviewRendered(buffer) | ActionOutcome::PreviewReused(buffer) => {
            let path = preview_path(container.config(), &args.input);
            println!("{} ({})", path.display(), format_file_size(buffer.len() as u64));
        }
    }
    Ok(())
}

/// Execute the thumbs command
pub async fn thumbs(config: AppConfig, args: ThumbsArgs) -> Result<()> {
    info!(input = %args.input.display(), count = config.thumbnail_count, "Starting thumbnails");

    let output_dir = config.output_dir.clone();
    let image_ext = config.thumbnail_ext.clone();
    let container = DefaultAppContainer::new(config, Arc::new(TracingPlaybackAdapter::new()));

    let source = container
        .upload_interactor()
        .accept_path(&args.input)
        .await
        .with_context(|| format!("Cannot use {}", args.input.display()))?;
    let session = container
        .open_session(source, &args.input)
        .await
        .context("Failed to start trim session")?;
    let set = session
        .ensure_thumbnails()
        .await
        .context("Thumbnail generation failed")?;

    let stem = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "video".to_string());
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    for thumbnail in &set.images {
        let path = output_dir.join(format!("{}_thumb_{:03}.{}", stem, thumbnail.index + 1, image_ext));
        tokio::fs::write(&path, &thumbnail.bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{}", path.display());
    }

    if set.is_partial() {
        eprintln!("Only {} of {} thumbnails could be generated", set.len(), set.requested);
    }
    Ok(())
}

/// Execute the timecode command
pub fn timecode(args: TimecodeArgs) -> Result<()> {
    let seconds = TimeCodec::parse(&args.text)?;
    println!("{}", TimeCodec::format(seconds));
    Ok(())
}

/// Execute the qualities command
pub fn qualities(args: QualitiesArgs) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(&QUALITY_PROFILES)
            .context("Failed to serialize quality profiles to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{:<10} {:>11} {:>8}", "Label", "Resolution", "Bitrate");
    for quality in QUALITY_PROFILES {
        let resolution = if quality.is_stream_copy() {
            "source".to_string()
        } else {
            format!("{}x{}", quality.target_width, quality.target_height)
        };
        println!("{:<10} {:>11} {:>8}", quality.label, resolution, quality.bitrate);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_path() {
        let config = AppConfig {
            output_dir: PathBuf::from("/tmp/out"),
            ..AppConfig::default()
        };
        assert_eq!(
            preview_path(&config, Path::new("/videos/holiday.mp4")),
            PathBuf::from("/tmp/out/preview-holiday.mp4")
        );
    }
}
