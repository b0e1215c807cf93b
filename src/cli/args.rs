//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input video file path (MP4)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start mark (SS, MM:SS or HH:MM:SS)
    #[arg(short, long)]
    pub start: String,

    /// End mark (SS, MM:SS or HH:MM:SS)
    #[arg(short, long)]
    pub end: String,

    /// Remove the audio track
    #[arg(long)]
    pub mute: bool,

    /// Quality profile label (Original, 1080p, 720p, 480p, 360p)
    #[arg(short, long, default_value = "Original")]
    pub quality: String,

    /// Render a preview instead of the final download
    #[arg(long)]
    pub preview: bool,
}

/// Arguments for the thumbs command
#[derive(Args, Debug)]
pub struct ThumbsArgs {
    /// Input video file path (MP4)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of thumbnails (overrides configuration)
    #[arg(short, long)]
    pub count: Option<usize>,
}

/// Arguments for the timecode command
#[derive(Args, Debug)]
pub struct TimecodeArgs {
    /// Time text to normalize
    pub text: String,
}

/// Arguments for the qualities command
#[derive(Args, Debug)]
pub struct QualitiesArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
