//! Configuration management for screen-rec.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        CalibrationConfig, CaptureConfig, DEFAULT_RECORDINGS_DIR, EngineConfig, SessionConfig,
        default_control, default_engine_program, default_start_timeout_secs,
    },
};

use screen_rec_core::{ControllerSettings, ManagerSettings};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::{ProjectDirs, UserDirs};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Capture engine settings.
    pub engine: EngineConfig,
    /// Output location.
    pub capture: CaptureConfig,
    /// Cell-to-pixel calibration.
    #[serde(default)]
    pub calibration: CalibrationConfig,
    /// Session timing and titles.
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<(Self, PathBuf)> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = Self::load_from(&config_path)?;
            Ok((config, config_path))
        } else {
            info!("No config found, creating default");
            let config = Self::with_defaults()?;
            config.save_to(&config_path)?;
            Ok((config, config_path))
        }
    }

    /// Load configuration from `path`.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Defaults: recordings under the user's video directory.
    #[track_caller]
    pub fn with_defaults() -> AppResult<Self> {
        let user_dirs = UserDirs::new().ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get user directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let videos = user_dirs
            .video_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| user_dirs.home_dir().join("Videos"));

        Ok(Self::for_output_dir(videos.join(DEFAULT_RECORDINGS_DIR)))
    }

    /// Defaults with recordings in `output_dir`.
    pub fn for_output_dir(output_dir: PathBuf) -> Self {
        Config {
            engine: EngineConfig {
                program: default_engine_program(),
                control: default_control(),
                start_timeout_secs: default_start_timeout_secs(),
            },
            capture: CaptureConfig { output_dir },
            calibration: CalibrationConfig::default(),
            session: SessionConfig::default(),
        }
    }

    /// Settings for the capture process manager.
    pub fn manager_settings(&self) -> ManagerSettings {
        ManagerSettings {
            strategy: self.engine.control,
            start_timeout: Duration::from_secs(self.engine.start_timeout_secs),
            ..ManagerSettings::default()
        }
    }

    /// Settings for the session controller.
    pub fn controller_settings(&self, workdir: Option<PathBuf>) -> ControllerSettings {
        ControllerSettings {
            output_dir: self.capture.output_dir.clone(),
            finalize_grace: Duration::from_millis(self.session.finalize_grace_ms),
            delete_grace: Duration::from_millis(self.session.delete_grace_ms),
            title_max_len: self.session.title_max_len,
            workdir,
        }
    }

    /// Directory for logs and recovery anchors.
    #[track_caller]
    pub fn data_dir() -> AppResult<PathBuf> {
        let data_dir = Self::project_dirs()?.data_dir().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
            debug!(data_dir = ?data_dir, "Created data directory");
        }

        Ok(data_dir)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "screen-rec", "Screen-Rec").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
