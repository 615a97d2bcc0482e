use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "oxiview",
    version,
    about = "A lightweight lazy-loading image viewer for the terminal",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to serve images from.
    #[arg(value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Images to display, by store file name. All stored images when omitted.
    #[arg(value_name = "IMAGE")]
    pub images: Vec<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Maximum images kept decoded in memory.
    #[arg(long, value_name = "N")]
    pub cache_capacity: Option<usize>,

    /// Downscale decoded images wider than this many pixels. Zero keeps
    /// full resolution.
    #[arg(long, value_name = "PX")]
    pub downscale_width: Option<u32>,

    /// Show an ASCII preview under each summary line.
    #[arg(long)]
    pub preview: Option<bool>,

    /// ASCII preview width in columns.
    #[arg(long, value_name = "COLS")]
    pub preview_cols: Option<u32>,

    /// Load every image up front instead of on first display.
    #[arg(long)]
    pub eager: bool,

    /// Queue background loads for all images before displaying.
    #[arg(long)]
    pub prefetch: bool,

    /// Display this image once more after the main pass.
    #[arg(long, value_name = "IMAGE")]
    pub repeat: Option<String>,
}
