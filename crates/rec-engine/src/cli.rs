use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default capture frame rate.
pub const DEFAULT_FRAMERATE: u32 = 30;
/// Default x264 preset.
pub const DEFAULT_PRESET: &str = "ultrafast";
/// Default x264 constant rate factor.
pub const DEFAULT_CRF: u8 = 23;

#[derive(Parser, Debug)]
#[command(name = "rec-engine")]
#[command(about = "Screen capture engine driving ffmpeg")]
#[command(version)]
pub struct Cli {
    /// Directory holding the pid, output-path and log files
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// ffmpeg executable
    #[arg(long, global = true, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start recording (optionally cropped)
    Start(StartOpts),
    /// Stop recording and finalize the file
    Stop,
    /// Freeze the running capture
    Pause,
    /// Unfreeze the running capture
    Resume,
    /// Report whether a capture is running
    Status,
    /// List capture devices
    Devices,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct StartOpts {
    /// Output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Crop X (pixels)
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<i32>,

    /// Crop Y (pixels)
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<i32>,

    /// Crop width (pixels)
    #[arg(long)]
    pub width: Option<u32>,

    /// Crop height (pixels)
    #[arg(long)]
    pub height: Option<u32>,

    /// Capture device (avfoundation index or X11 display); detected when absent
    #[arg(long)]
    pub device: Option<String>,

    /// Target frame rate
    #[arg(long, default_value_t = DEFAULT_FRAMERATE)]
    pub framerate: u32,

    /// x264 preset (faster presets use less CPU)
    #[arg(long, default_value = DEFAULT_PRESET)]
    pub preset: String,

    /// x264 CRF (higher = smaller, lower quality)
    #[arg(long, default_value_t = DEFAULT_CRF)]
    pub crf: u8,
}
