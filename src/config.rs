//! Configuration file handling for ascii-preview.
//!
//! Loads configuration from `<config dir>/ascii-preview/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ascii::{CharSet, GlyphRamp, Sampling, MAX_FILTER_STRENGTH};
use crate::schedule::Schedule;
use crate::source::Resolution;

/// Configuration file structure for ascii-preview.
/// Loaded from the platform config dir (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    /// Resolution hint handed to the source; native size when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Target capture rate; overrides `schedule.throttle_ms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(default)]
    pub mirror: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSection {
    #[serde(default = "default_filter_strength")]
    pub filter_strength: u32,
    /// standard | blocks | detailed | dense
    #[serde(default = "default_ramp")]
    pub ramp: String,
    /// Overrides `ramp` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_ramp: Option<String>,
    /// point | average
    #[serde(default = "default_sampling")]
    pub sampling: String,
    #[serde(default)]
    pub invert: bool,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            filter_strength: default_filter_strength(),
            ramp: default_ramp(),
            custom_ramp: None,
            sampling: default_sampling(),
            invert: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            idle_ms: default_idle_ms(),
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `ascii_preview=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Logging is off unless a file is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_filter_strength() -> u32 {
    1
}

fn default_ramp() -> String {
    "standard".to_string()
}

fn default_sampling() -> String {
    "point".to_string()
}

fn default_throttle_ms() -> u64 {
    40
}

fn default_idle_ms() -> u64 {
    20
}

fn default_retry_base_ms() -> u64 {
    100
}

fn default_retry_max_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            Self::parse(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })
        } else {
            Ok(Config::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize to TOML, as printed by `config show`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Resolution hint from `source.width` and `source.height`; both must be set.
    pub fn resolution(&self) -> Result<Option<Resolution>, ConfigError> {
        match (self.source.width, self.source.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => {
                Ok(Some(Resolution { width, height }))
            }
            (None, None) => Ok(None),
            (width, height) => Err(ConfigError::InvalidValue {
                key: "source.width/height",
                value: format!("{:?}x{:?}", width, height),
            }),
        }
    }

    /// Sampling stride from `render.filter_strength`, 1 to
    /// [`MAX_FILTER_STRENGTH`].
    pub fn filter_strength(&self) -> Result<NonZeroU32, ConfigError> {
        let strength = self.render.filter_strength;
        NonZeroU32::new(strength)
            .filter(|s| s.get() <= MAX_FILTER_STRENGTH)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "render.filter_strength",
                value: strength.to_string(),
            })
    }

    /// Built-in ramp named by `render.ramp`.
    pub fn char_set(&self) -> Result<CharSet, ConfigError> {
        parse_char_set(&self.render.ramp).ok_or_else(|| ConfigError::InvalidValue {
            key: "render.ramp",
            value: self.render.ramp.clone(),
        })
    }

    /// Ramp to render with: `render.custom_ramp` if set, else `render.ramp`.
    pub fn glyph_ramp(&self) -> Result<GlyphRamp, ConfigError> {
        match &self.render.custom_ramp {
            Some(custom) => GlyphRamp::new(custom).map_err(|_| ConfigError::InvalidValue {
                key: "render.custom_ramp",
                value: custom.clone(),
            }),
            None => Ok(self.char_set()?.ramp()),
        }
    }

    pub fn sampling(&self) -> Result<Sampling, ConfigError> {
        parse_sampling(&self.render.sampling).ok_or_else(|| ConfigError::InvalidValue {
            key: "render.sampling",
            value: self.render.sampling.clone(),
        })
    }

    /// Timing settings; `source.fps` takes precedence over `schedule.throttle_ms`.
    pub fn schedule(&self) -> Schedule {
        let schedule = Schedule {
            throttle: Duration::from_millis(self.schedule.throttle_ms),
            idle: Duration::from_millis(self.schedule.idle_ms),
            retry_base: Duration::from_millis(self.schedule.retry_base_ms),
            retry_max: Duration::from_millis(self.schedule.retry_max_ms),
        };
        match self.source.fps {
            Some(fps) => schedule.with_fps(fps),
            None => schedule,
        }
    }
}

/// Ramp by name, case-insensitive.
pub fn parse_char_set(name: &str) -> Option<CharSet> {
    match name.to_ascii_lowercase().as_str() {
        "standard" => Some(CharSet::Standard),
        "blocks" => Some(CharSet::Blocks),
        "detailed" => Some(CharSet::Detailed),
        "dense" => Some(CharSet::Dense),
        _ => None,
    }
}

/// Sampling mode by name, case-insensitive.
pub fn parse_sampling(name: &str) -> Option<Sampling> {
    match name.to_ascii_lowercase().as_str() {
        "point" => Some(Sampling::Point),
        "average" => Some(Sampling::Average),
        _ => None,
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        key: &'static str,
        value: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value '{}' for config key '{}'", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("com", "ascii-preview", "ascii-preview")
        .map(|d| d.config_dir().to_path_buf().join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-preview/config.toml")
        })
}

/// Commented default configuration written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# ascii-preview configuration

[source]
# Decode at this size instead of the native one (lower = faster)
# width = 960
# height = 720
# Fixed capture rate. Unset plays media at its own rate and falls back to
# schedule.throttle_ms when the rate is unknown
# fps = 25
# Mirror horizontally (selfie mode)
mirror = false

[render]
# Pixels per glyph column; rows use twice as many (1-64)
filter_strength = 1
# Ramp: standard, blocks, detailed, dense
ramp = "standard"
# Custom ramp from sparsest to densest glyph (overrides ramp)
# custom_ramp = " .oO@"
# Sampling: point, average
sampling = "point"
# Invert brightness (for light themes)
invert = false

[schedule]
# Delay between captured frames when no rate is known
throttle_ms = 40
# Render loop sleep when no frame is waiting
idle_ms = 20
# Backoff for live sources after a failed read
retry_base_ms = 100
retry_max_ms = 2000

[log]
level = "info"
# Logging is disabled unless a file is set
# file = "/tmp/ascii-preview.log"
"#;

/// Write [`DEFAULT_CONFIG_TOML`] to `path`, creating parent directories.
///
/// Refuses to overwrite an existing file.
pub fn write_default(path: &Path) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        return Err(io_error(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "config file already exists",
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML).map_err(io_error)
}
