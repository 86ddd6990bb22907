//! Configuration and color scheme management for termfolio.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.termfolio/config.toml`
//! - Built-in color schemes (default, dracula, nord, tokyo-night, matrix)
//!
//! # Configuration File
//!
//! ```toml
//! # Color scheme: default, dracula, nord, tokyo-night, matrix
//! color_scheme = "tokyo-night"
//!
//! # Profile data file (optional, defaults to ~/.termfolio/profile.toml)
//! profile = "/path/to/profile.toml"
//!
//! [prompt]
//! user = "guest"
//! host = "portfolio"
//!
//! [boot]
//! enabled = true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::LineKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Color scheme name
    pub color_scheme: String,
    /// Profile data file
    pub profile: Option<PathBuf>,
    /// Prompt settings
    pub prompt: PromptConfig,
    /// Boot sequence settings
    pub boot: BootConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_scheme: "default".to_string(),
            profile: None,
            prompt: PromptConfig::default(),
            boot: BootConfig::default(),
        }
    }
}

/// Prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub user: String,
    pub host: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            user: "guest".to_string(),
            host: "portfolio".to_string(),
        }
    }
}

impl PromptConfig {
    /// Prompt text shown before the input
    pub fn render(&self) -> String {
        format!("{}@{}:~$ ", self.user, self.host)
    }
}

/// Boot sequence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    pub enabled: bool,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = config_dir().map(|dir| dir.join("config.toml")) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load configuration from a file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Profile file to read, if one is configured or present
    pub fn profile_path(&self) -> Option<PathBuf> {
        match &self.profile {
            Some(path) => Some(expand_home(path)),
            None => config_dir()
                .map(|dir| dir.join("profile.toml"))
                .filter(|path| path.exists()),
        }
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.color_scheme)
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,

    // Prompt colors
    pub prompt_fg: Color,

    // Transcript colors by line kind
    pub input_fg: Color,
    pub output_fg: Color,
    pub system_fg: Color,
    pub error_fg: Color,
    pub success_fg: Color,

    // Notification toast
    pub toast_bg: Color,
    pub toast_fg: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    /// Foreground for a transcript line
    pub fn line_fg(&self, kind: LineKind) -> Color {
        match kind {
            LineKind::Input => self.input_fg,
            LineKind::Output => self.output_fg,
            LineKind::System => self.system_fg,
            LineKind::Error => self.error_fg,
            LineKind::Success => self.success_fg,
        }
    }

    /// Default color scheme
    pub fn default_scheme() -> Self {
        Self {
            name: "default".to_string(),
            prompt_fg: Color::new(100, 150, 255),
            input_fg: Color::new(255, 255, 255),
            output_fg: Color::new(200, 200, 200),
            system_fg: Color::new(150, 150, 150),
            error_fg: Color::new(240, 80, 80),
            success_fg: Color::new(90, 210, 120),
            toast_bg: Color::new(200, 200, 0),
            toast_fg: Color::new(0, 0, 0),
        }
    }

    /// Dracula scheme
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            prompt_fg: Color::new(189, 147, 249),
            input_fg: Color::new(248, 248, 242),
            output_fg: Color::new(248, 248, 242),
            system_fg: Color::new(98, 114, 164),
            error_fg: Color::new(255, 85, 85),
            success_fg: Color::new(80, 250, 123),
            toast_bg: Color::new(189, 147, 249),
            toast_fg: Color::new(40, 42, 54),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            prompt_fg: Color::new(136, 192, 208),
            input_fg: Color::new(236, 239, 244),
            output_fg: Color::new(216, 222, 233),
            system_fg: Color::new(147, 161, 181),
            error_fg: Color::new(191, 97, 106),
            success_fg: Color::new(163, 190, 140),
            toast_bg: Color::new(136, 192, 208),
            toast_fg: Color::new(46, 52, 64),
        }
    }

    /// Tokyo Night scheme
    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night".to_string(),
            prompt_fg: Color::new(122, 162, 247),
            input_fg: Color::new(192, 202, 245),
            output_fg: Color::new(169, 177, 214),
            system_fg: Color::new(86, 95, 137),
            error_fg: Color::new(247, 118, 142),
            success_fg: Color::new(158, 206, 106),
            toast_bg: Color::new(122, 162, 247),
            toast_fg: Color::new(26, 27, 38),
        }
    }

    /// Green-on-black
    pub fn matrix() -> Self {
        Self {
            name: "matrix".to_string(),
            prompt_fg: Color::new(0, 255, 65),
            input_fg: Color::new(180, 255, 180),
            output_fg: Color::new(0, 200, 60),
            system_fg: Color::new(0, 130, 40),
            error_fg: Color::new(255, 60, 60),
            success_fg: Color::new(0, 255, 65),
            toast_bg: Color::new(0, 255, 65),
            toast_fg: Color::new(0, 0, 0),
        }
    }

    /// Get scheme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "nord" => Self::nord(),
            "tokyo-night" | "tokyo_night" | "tokyonight" => Self::tokyo_night(),
            "matrix" => Self::matrix(),
            _ => Self::default_scheme(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec!["default", "dracula", "nord", "tokyo-night", "matrix"]
    }
}

/// termfolio's directory under the user's home
pub fn config_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".termfolio"))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
