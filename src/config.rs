//! Configuration types.
//!
//! Loaded from config.json at startup and handed to the pipeline explicitly.
//! Every field has a default, so a partial (or missing) file still yields a
//! usable configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::logline::EventPatternSpec;

/// Fixed screen rectangle sampled for the game log, in absolute pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureRegion {
    fn default() -> Self {
        // Message log position at 1920x1080 with the default HoI3 layout
        Self {
            x: 861,
            y: 815,
            width: 437,
            height: 139,
        }
    }
}

/// Parameters of the image enhancement chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Grayscale values strictly above this become white, everything else black
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Linear upscale factor applied to both dimensions
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Sigma of the noise-suppressing Gaussian blur
    #[serde(default = "default_blur_sigma")]
    pub blur_sigma: f32,
    /// Sigma of the unsharp mask
    #[serde(default = "default_unsharp_sigma")]
    pub unsharp_sigma: f32,
    /// Minimum difference before the unsharp mask touches a pixel
    #[serde(default = "default_unsharp_threshold")]
    pub unsharp_threshold: i32,
}

fn default_threshold() -> u8 {
    41
}

fn default_scale_factor() -> f64 {
    2.7
}

fn default_blur_sigma() -> f32 {
    0.8
}

fn default_unsharp_sigma() -> f32 {
    2.0
}

fn default_unsharp_threshold() -> i32 {
    3
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            scale_factor: default_scale_factor(),
            blur_sigma: default_blur_sigma(),
            unsharp_sigma: default_unsharp_sigma(),
            unsharp_threshold: default_unsharp_threshold(),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub capture_region: CaptureRegion,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    /// Explicit Tesseract executable; discovered automatically when absent
    #[serde(default)]
    pub tesseract_path: Option<PathBuf>,
    /// Localisation CSV holding the province names
    #[serde(default = "crate::paths::default_province_names_path")]
    pub province_names_path: PathBuf,
    /// Append-only file receiving every validated text block
    #[serde(default = "crate::paths::default_concatenated_log_path")]
    pub concatenated_log_path: PathBuf,
    /// Event patterns registered after the built-in ones
    #[serde(default)]
    pub extra_event_patterns: Vec<EventPatternSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture_region: CaptureRegion::default(),
            preprocess: PreprocessConfig::default(),
            tesseract_path: None,
            province_names_path: crate::paths::default_province_names_path(),
            concatenated_log_path: crate::paths::default_concatenated_log_path(),
            extra_event_patterns: Vec::new(),
        }
    }
}

/// Loads configuration from `path`, falling back to defaults when the file
/// is missing or cannot be parsed.
pub fn load_config_from(path: &Path) -> AppConfig {
    info!("Looking for config at: {}", path.display());

    if !path.exists() {
        info!("config.json not found. Using default config.");
        return AppConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                AppConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
            AppConfig::default()
        }
    }
}

/// Loads config.json from the executable's directory.
pub fn load_config() -> AppConfig {
    load_config_from(&crate::paths::get_exe_dir().join("config.json"))
}
