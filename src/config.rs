//! Album configuration.
//!
//! Handles loading, merging and validating `album.toml`. Stock defaults are
//! overridden by an optional `album.toml` in the photo folder (or a file given
//! with `--config`), and then by command-line flags.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [photo]
//! aspect_ratio = [5, 7]     # crop ratio, width:height
//! width_inches = 5.0        # printed photo size
//! height_inches = 7.0
//! dpi = 300                 # output resolution
//!
//! [page]
//! width_inches = 8.5        # US Letter
//! height_inches = 11.0
//! margin_points = 36.0      # 72 points = 1 inch
//! spacing_points = 20.0     # gap between stacked photos
//! photos_per_page = 2
//!
//! [detector]
//! scale_factor = 1.1
//! min_neighbors = 5
//! min_size = [30, 30]
//! # model_path = "seeta_fd_frontal_v1.0.bin"
//!
//! [label]
//! enabled = true
//! font_points = 10.0
//! # font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
//!
//! [processing]
//! # max_processes = 4
//! ```
//!
//! ## Validation
//!
//! Loading only parses; [`AlbumConfig::validate`] runs once every override is
//! applied. It rejects zero ratios or DPI, a crop ratio that disagrees with the
//! photo size, and any page geometry whose photos would not fit on the page.
//! The stock defaults fall in that last group: two 7in photos plus margins and
//! spacing need 1100pt on a 792pt Letter page.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{DetectorParams, target_pixel_size};
use crate::layout::{LayoutError, PageGeometry, POINTS_PER_INCH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the photo folder.
pub const CONFIG_FILE_NAME: &str = "album.toml";

/// Largest tolerated difference between the crop ratio and the photo's own ratio.
const RATIO_TOLERANCE: f64 = 1e-6;

/// Largest composed photo side, in pixels (over 60in at 300dpi).
pub const MAX_PHOTO_SIDE_PX: f64 = 20_000.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Page layout does not fit: {0}")]
    Layout(#[from] LayoutError),
}

/// Album configuration loaded from `album.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlbumConfig {
    /// Printed photo size, crop ratio and resolution.
    pub photo: PhotoConfig,
    /// Paper size and the column layout on it.
    pub page: PageConfig,
    /// Face detector sensitivity and model.
    pub detector: DetectorConfig,
    /// Filename label drawn on each photo.
    pub label: LabelConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AlbumConfig {
    /// Validate config values and the page geometry they produce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [aw, ah] = self.photo.aspect_ratio;
        if aw == 0 || ah == 0 {
            return Err(ConfigError::Validation(
                "photo.aspect_ratio values must be non-zero".into(),
            ));
        }
        if self.photo.dpi == 0 {
            return Err(ConfigError::Validation("photo.dpi must be positive".into()));
        }
        if [self.photo.width_inches, self.photo.height_inches]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(ConfigError::Validation(
                "photo.width_inches and photo.height_inches must be positive".into(),
            ));
        }
        let photo_ratio = self.photo.width_inches / self.photo.height_inches;
        if (photo_ratio - self.target_ratio()).abs() > RATIO_TOLERANCE {
            return Err(ConfigError::Validation(format!(
                "photo.aspect_ratio {aw}:{ah} does not match the photo size {}x{}in",
                self.photo.width_inches, self.photo.height_inches
            )));
        }
        for (axis, inches) in [
            ("width", self.photo.width_inches),
            ("height", self.photo.height_inches),
        ] {
            let px = (inches * self.photo.dpi as f64).round();
            if !(1.0..=MAX_PHOTO_SIDE_PX).contains(&px) {
                return Err(ConfigError::Validation(format!(
                    "photo {axis} of {inches}in at {}dpi is {px} pixels; must be 1 to {MAX_PHOTO_SIDE_PX}",
                    self.photo.dpi
                )));
            }
        }
        let scale = self.detector.scale_factor;
        if !scale.is_finite() || scale <= 1.0 {
            return Err(ConfigError::Validation(
                "detector.scale_factor must be greater than 1.0".into(),
            ));
        }
        if self.detector.min_size.contains(&0) {
            return Err(ConfigError::Validation(
                "detector.min_size values must be non-zero".into(),
            ));
        }
        let points = self.label.font_points;
        if self.label.enabled && (!points.is_finite() || points <= 0.0) {
            return Err(ConfigError::Validation(
                "label.font_points must be positive".into(),
            ));
        }
        self.geometry().validate()?;
        Ok(())
    }

    /// Crop ratio as width / height.
    pub fn target_ratio(&self) -> f64 {
        let [w, h] = self.photo.aspect_ratio;
        w as f64 / h as f64
    }

    /// Output size of each composed photo, in pixels.
    pub fn target_pixels(&self) -> (u32, u32) {
        target_pixel_size(
            (self.photo.width_inches, self.photo.height_inches),
            self.photo.dpi,
        )
    }

    /// Label font size in output pixels.
    pub fn label_px(&self) -> f32 {
        (self.label.font_points * self.photo.dpi as f64 / POINTS_PER_INCH) as f32
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::from_inches(
            (self.page.width_inches, self.page.height_inches),
            (self.photo.width_inches, self.photo.height_inches),
            self.page.margin_points,
            self.page.spacing_points,
            self.page.photos_per_page,
        )
    }

    pub fn detector_params(&self) -> DetectorParams {
        DetectorParams {
            scale_factor: self.detector.scale_factor,
            min_neighbors: self.detector.min_neighbors,
            min_size: self.detector.min_size,
        }
    }
}

/// Printed photo settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotoConfig {
    /// Crop ratio as `[width, height]`, e.g. `[5, 7]`.
    pub aspect_ratio: [u32; 2],
    pub width_inches: f64,
    pub height_inches: f64,
    /// Output resolution in dots per inch.
    pub dpi: u32,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: [5, 7],
            width_inches: 5.0,
            height_inches: 7.0,
            dpi: 300,
        }
    }
}

/// Paper and layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub width_inches: f64,
    pub height_inches: f64,
    /// Space above the first photo and at the page sides, in points.
    pub margin_points: f64,
    /// Gap between consecutive photos, in points.
    pub spacing_points: f64,
    pub photos_per_page: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width_inches: 8.5,
            height_inches: 11.0,
            margin_points: 36.0,
            spacing_points: 20.0,
            photos_per_page: 2,
        }
    }
}

/// Face detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub scale_factor: f64,
    pub min_neighbors: u32,
    /// Smallest face, `[width, height]` in pixels.
    pub min_size: [u32; 2],
    /// SeetaFace model file. Without one, crops center on the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let params = DetectorParams::default();
        Self {
            scale_factor: params.scale_factor,
            min_neighbors: params.min_neighbors,
            min_size: params.min_size,
            model_path: None,
        }
    }
}

/// Filename label settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    pub enabled: bool,
    /// Printed text size in points; scaled by DPI to pixels.
    pub font_points: f64,
    /// TrueType font to use instead of the system font search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font_points: 10.0,
            font_path: None,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AlbumConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a TOML file as a raw value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value and deserialize.
///
/// Does not validate: callers apply command-line overrides first.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AlbumConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Load `album.toml` from `folder` on top of the stock defaults.
pub fn load_config(folder: &Path) -> Result<AlbumConfig, ConfigError> {
    load_config_file(&folder.join(CONFIG_FILE_NAME))
}

/// Load an explicit config file on top of the stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config_file(path: &Path) -> Result<AlbumConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock `album.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Print Album Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as album.toml in the photo folder, or pass --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Photo
# ---------------------------------------------------------------------------
[photo]
# Crop ratio as [width, height]. Must match width_inches:height_inches.
aspect_ratio = [5, 7]

# Printed size of each photo.
width_inches = 5.0
height_inches = 7.0

# Output resolution. 5in x 300dpi = 1500px.
dpi = 300

# ---------------------------------------------------------------------------
# Page
# ---------------------------------------------------------------------------
[page]
# US Letter.
width_inches = 8.5
height_inches = 11.0

# 72 points = 1 inch.
margin_points = 36.0
spacing_points = 20.0

# Photos are stacked in one centered column.
# NOTE: two 5x7 photos do not fit on Letter (1100pt needed, 792pt available).
# Use photos_per_page = 1, or a smaller 5:7 photo such as 3.0 x 4.2.
photos_per_page = 2

# ---------------------------------------------------------------------------
# Face detection
# ---------------------------------------------------------------------------
[detector]
# Step between detection scales (> 1.0). Smaller is finer and slower.
scale_factor = 1.1

# Higher values keep fewer, more certain faces.
min_neighbors = 5

# Smallest face considered, [width, height] in pixels.
min_size = [30, 30]

# SeetaFace frontal model (seeta_fd_frontal_v1.0.bin).
# Without a model every crop centers on the image.
# model_path = "seeta_fd_frontal_v1.0.bin"

# ---------------------------------------------------------------------------
# Filename labels
# ---------------------------------------------------------------------------
[label]
enabled = true

# Printed text size in points.
font_points = 10.0

# TrueType font. When unset, common system fonts are tried.
# font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
