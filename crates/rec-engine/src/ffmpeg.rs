//! ffmpeg command lines and output interpretation.

use crate::{EngineError, EngineResult, StartOpts};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use directories::UserDirs;
use error_location::ErrorLocation;

const RECORDINGS_DIR: &str = "screen-recordings";
const SCREEN_DEVICE_PREFIX: &str = "Capture screen";

/// Platform screen grabber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// macOS `avfoundation`; devices are numeric indices.
    AvFoundation,
    /// X11 `x11grab`; devices are display names such as `:0`.
    X11Grab,
}

impl Backend {
    /// Grabber for the current platform.
    pub fn native() -> Self {
        if cfg!(target_os = "macos") {
            Self::AvFoundation
        } else {
            Self::X11Grab
        }
    }

    fn format(&self) -> &'static str {
        match self {
            Self::AvFoundation => "avfoundation",
            Self::X11Grab => "x11grab",
        }
    }

    /// Input argument for `device`.
    fn input(&self, device: &str) -> String {
        match self {
            // Video only; audio comes from the silent source.
            Self::AvFoundation => format!("{}:none", device),
            Self::X11Grab => device.to_string(),
        }
    }

    /// Arguments that make ffmpeg print the device list (to stderr).
    pub fn list_devices_args(&self) -> Vec<String> {
        match self {
            Self::AvFoundation => ["-hide_banner", "-f", "avfoundation", "-list_devices", "true", "-i", ""]
                .map(String::from)
                .to_vec(),
            Self::X11Grab => ["-hide_banner", "-sources", "x11grab"].map(String::from).to_vec(),
        }
    }
}

/// Pixel crop applied through ffmpeg's `crop` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width, even.
    pub width: u32,
    /// Height, even.
    pub height: u32,
}

impl Crop {
    /// Crop from the start options. All four values or none must be given.
    ///
    /// Parts left of or above the screen are cut off and odd sizes rounded
    /// down, because yuv420p needs even dimensions.
    #[track_caller]
    pub fn from_opts(opts: &StartOpts) -> EngineResult<Option<Self>> {
        let (x, y, width, height) = match (opts.x, opts.y, opts.width, opts.height) {
            (None, None, None, None) => return Ok(None),
            (Some(x), Some(y), Some(w), Some(h)) => (x, y, w, h),
            _ => {
                return Err(EngineError::InvalidCrop {
                    reason: "--x, --y, --width and --height must be given together".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let width = width.saturating_sub(x.min(0).unsigned_abs()) & !1;
        let height = height.saturating_sub(y.min(0).unsigned_abs()) & !1;

        if width == 0 || height == 0 {
            return Err(EngineError::InvalidCrop {
                reason: "crop rectangle has no visible area".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Some(Self {
            x: x.max(0).unsigned_abs(),
            y: y.max(0).unsigned_abs(),
            width,
            height,
        }))
    }

    /// `crop=W:H:X:Y`.
    pub fn filter(&self) -> String {
        format!("crop={}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }
}

/// Everything needed to build the capture command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSpec {
    /// Screen grabber.
    pub backend: Backend,
    /// Grabber device.
    pub device: String,
    /// Frames per second.
    pub framerate: u32,
    /// x264 preset.
    pub preset: String,
    /// x264 CRF.
    pub crf: u8,
    /// Optional crop.
    pub crop: Option<Crop>,
    /// Output file.
    pub output: PathBuf,
}

impl CaptureSpec {
    /// Full ffmpeg argument list.
    ///
    /// A silent audio track and the high profile keep the file playable in
    /// QuickTime; `+faststart` moves the index to the front on finalize.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-f".into(),
            self.backend.format().into(),
            "-framerate".into(),
            self.framerate.to_string(),
            "-i".into(),
            self.backend.input(&self.device),
            "-f".into(),
            "lavfi".into(),
            "-i".into(),
            "anullsrc".into(),
            "-c:v".into(),
            "libx264".into(),
            "-preset".into(),
            self.preset.clone(),
            "-crf".into(),
            self.crf.to_string(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-profile:v".into(),
            "high".into(),
            "-level".into(),
            "4.2".into(),
            "-movflags".into(),
            "+faststart".into(),
            "-shortest".into(),
        ];

        if let Some(crop) = self.crop {
            args.push("-filter:v".into());
            args.push(crop.filter());
        }

        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

/// A video device from the avfoundation listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDevice {
    /// avfoundation index.
    pub index: u32,
    /// Device name.
    pub name: String,
}

/// Parse video devices from `ffmpeg -f avfoundation -list_devices true` output.
pub fn parse_video_devices(listing: &str) -> Vec<VideoDevice> {
    let mut in_video = false;
    let mut devices = Vec::new();

    for line in listing.lines() {
        if line.contains("video devices:") {
            in_video = true;
            continue;
        }
        if line.contains("audio devices:") {
            in_video = false;
            continue;
        }
        if !in_video {
            continue;
        }

        // "[AVFoundation indev @ 0x...] [4] Capture screen 0"
        let Some((_, rest)) = line.split_once("] [") else {
            continue;
        };
        let Some((index, name)) = rest.split_once(']') else {
            continue;
        };
        if let Ok(index) = index.trim().parse() {
            devices.push(VideoDevice {
                index,
                name: name.trim().to_string(),
            });
        }
    }

    devices
}

/// Index of the first screen among `devices`.
pub fn screen_device(devices: &[VideoDevice]) -> Option<u32> {
    devices
        .iter()
        .find(|d| d.name.starts_with(SCREEN_DEVICE_PREFIX))
        .map(|d| d.index)
}

/// Error for an ffmpeg that died right after launch, judged from its log.
#[track_caller]
pub fn classify_failure(log_tail: &str, log: &Path) -> EngineError {
    let lower = log_tail.to_lowercase();
    let location = ErrorLocation::from(Location::caller());

    if lower.contains("not authorized") || lower.contains("permission denied") {
        EngineError::PermissionDenied {
            log: log.to_path_buf(),
            location,
        }
    } else if lower.contains("cannot open display") {
        EngineError::NoScreenDevice {
            reason: "X display unavailable".to_string(),
            location,
        }
    } else {
        EngineError::FfmpegFailed {
            reason: format!("ffmpeg exited immediately; see {}", log.display()),
            location,
        }
    }
}

/// `rec_YYYYMMDD_HHMMSS.mp4`.
pub fn output_file_name(now: DateTime<Local>) -> String {
    format!("rec_{}.mp4", now.format("%Y%m%d_%H%M%S"))
}

/// Recordings directory under the user's video folder.
pub fn default_output_dir() -> PathBuf {
    match UserDirs::new() {
        Some(dirs) => dirs
            .video_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dirs.home_dir().join("Videos"))
            .join(RECORDINGS_DIR),
        None => PathBuf::from(".").join(RECORDINGS_DIR),
    }
}
