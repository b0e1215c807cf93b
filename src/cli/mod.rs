//! CLI module for Trimmify
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{QualitiesArgs, ThumbsArgs, TimecodeArgs, TrimArgs};

/// Trimmify video trimmer
///
/// Trim a clip between two marks, preview it, optionally mute or scale it,
/// and extract a thumbnail strip, using ffmpeg as the media engine.
#[derive(Parser, Debug)]
#[command(name = "trimmify")]
#[command(about = "Trimmify - Trim, preview and re-encode video clips")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: trimmify.toml or config/trimmify.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Directory for downloads, previews and thumbnails
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim a video between two marks
    Trim(args::TrimArgs),
    /// Extract the thumbnail strip of a video
    Thumbs(args::ThumbsArgs),
    /// Normalize a time into HH:MM:SS
    Timecode(args::TimecodeArgs),
    /// List the available quality profiles
    Qualities(args::QualitiesArgs),
}
