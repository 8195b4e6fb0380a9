use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Anchor;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid container dimensions: width={width} height={height} (must be positive)")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("invalid spacing: padding={padding} margin={margin} (must be non-negative)")]
    InvalidSpacing { padding: f64, margin: f64 },

    #[error("invalid scale factor: {scale_factor} (must be positive)")]
    InvalidScaleFactor { scale_factor: f64 },

    #[error("unknown preset size: {name:?}")]
    UnknownPreset { name: String },

    #[error("unknown resize anchor: {name:?}")]
    UnknownAnchor { name: String },
}

/// A4 portrait in points, the default page the original tool targets.
pub const A4_WIDTH_PT: f64 = 595.0;
pub const A4_HEIGHT_PT: f64 = 842.0;

const APP_DIR: &str = "sheetpack";
const APP_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

/// Snapshot of the container and display settings the engine works against.
/// Rebuilt views receive this wholesale; the engine never reads ambient
/// state.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Page width in page units.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Page height in page units.
    #[serde(default = "default_height")]
    pub height: f64,
    /// External spacing between packed items.
    #[serde(default)]
    pub padding: f64,
    /// Spacing between items and the page edge.
    #[serde(default)]
    pub margin: f64,
    /// Page units to display pixels; recomputed by the host on viewport
    /// resize and passed back in.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Whether exported images get a visible border stroke.
    #[serde(default)]
    pub show_border: bool,
    /// Whether the packer may rotate items 90 degrees.
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
}

fn default_width() -> f64 {
    A4_WIDTH_PT
}

fn default_height() -> f64 {
    A4_HEIGHT_PT
}

fn default_scale_factor() -> f64 {
    1.0
}

fn default_allow_rotation() -> bool {
    true
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            padding: 0.0,
            margin: 0.0,
            scale_factor: default_scale_factor(),
            show_border: false,
            allow_rotation: default_allow_rotation(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.padding < 0.0 || self.margin < 0.0 {
            return Err(ConfigError::InvalidSpacing {
                padding: self.padding,
                margin: self.margin,
            });
        }
        if self.scale_factor <= 0.0 {
            return Err(ConfigError::InvalidScaleFactor {
                scale_factor: self.scale_factor,
            });
        }
        Ok(())
    }

    /// Usable width once the page-edge margin is taken on both sides.
    pub fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    /// Usable height once the page-edge margin is taken on both sides.
    pub fn inner_height(&self) -> f64 {
        (self.height - 2.0 * self.margin).max(0.0)
    }
}

/// Standard print sizes, in A4 points. Names are what the host UI shows in
/// its preset menu.
const PRESET_SIZES: &[(&str, f64, f64)] = &[
    ("passport", 99.0, 128.0),
    ("4x6", 288.0, 432.0),
    ("5x7", 360.0, 504.0),
    ("a6", 297.5, 421.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetSize {
    pub w: f64,
    pub h: f64,
}

pub fn resolve_preset(name: &str) -> ConfigResult<PresetSize> {
    PRESET_SIZES
        .iter()
        .find(|(preset, _, _)| *preset == name)
        .map(|&(_, w, h)| PresetSize { w, h })
        .ok_or_else(|| ConfigError::UnknownPreset {
            name: name.to_string(),
        })
}

pub fn resolve_anchor(name: &str) -> ConfigResult<Anchor> {
    match name {
        "top-left" => Ok(Anchor::TopLeft),
        "top-right" => Ok(Anchor::TopRight),
        "bottom-left" => Ok(Anchor::BottomLeft),
        "bottom-right" => Ok(Anchor::BottomRight),
        _ => Err(ConfigError::UnknownAnchor {
            name: name.to_string(),
        }),
    }
}

pub fn load_layout_config() -> LayoutConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_layout_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_layout_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> LayoutConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return LayoutConfig::default(),
    };
    if !path.exists() {
        return LayoutConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            LayoutConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            LayoutConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "sheetpack",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/config-root/sheetpack/config.json"));
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path("sheetpack", "config.json", None, Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/home/.config/sheetpack/config.json"));
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("sheetpack", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn validate_rejects_non_positive_dimensions() {
        let config = LayoutConfig {
            width: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn validate_rejects_negative_spacing_and_zero_scale() {
        let config = LayoutConfig {
            margin: -1.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpacing { .. })
        ));

        let config = LayoutConfig {
            scale_factor: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScaleFactor { .. })
        ));
    }

    #[test]
    fn inner_dimensions_subtract_margin_on_both_sides() {
        let config = LayoutConfig {
            width: 600.0,
            height: 800.0,
            margin: 25.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.inner_width(), 550.0);
        assert_eq!(config.inner_height(), 750.0);
    }

    #[test]
    fn resolve_preset_and_anchor_report_unknown_names() {
        let preset = resolve_preset("4x6").expect("known preset");
        assert_eq!((preset.w, preset.h), (288.0, 432.0));
        assert!(matches!(
            resolve_preset("16x20"),
            Err(ConfigError::UnknownPreset { .. })
        ));

        assert_eq!(
            resolve_anchor("bottom-right").expect("known anchor"),
            Anchor::BottomRight
        );
        assert!(matches!(
            resolve_anchor("center"),
            Err(ConfigError::UnknownAnchor { .. })
        ));
    }
}
