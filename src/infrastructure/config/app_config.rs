//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::infrastructure::cache::DEFAULT_CACHE_CAPACITY;
use crate::infrastructure::loader::ImageLoaderConfig;

const APP_NAME: &str = "oxiview";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "oxiview";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, merged from the config file and the CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory the image store reads from when the CLI gives none.
    #[serde(default)]
    pub store_root: Option<PathBuf>,

    /// Cache and loading configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Cache and loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum images kept decoded in memory.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Maximum loads decoded concurrently.
    #[serde(default = "default_max_concurrent_loads")]
    pub max_concurrent_loads: usize,

    /// Decoded images wider than this are downscaled to fit it.
    /// Zero keeps full resolution.
    #[serde(default = "default_downscale_width")]
    pub downscale_width: u32,
}

impl CacheConfig {
    /// Translates the section into a loader configuration.
    #[must_use]
    pub fn loader_config(&self) -> ImageLoaderConfig {
        ImageLoaderConfig {
            cache_capacity: self.capacity,
            max_concurrent_loads: self.max_concurrent_loads.max(1),
            downscale_width: (self.downscale_width > 0).then_some(self.downscale_width),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            max_concurrent_loads: default_max_concurrent_loads(),
            downscale_width: default_downscale_width(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show an ASCII preview under each summary line.
    #[serde(default = "default_true")]
    pub preview: bool,

    /// ASCII preview width in columns.
    #[serde(default = "default_preview_cols")]
    pub preview_cols: u32,
}

impl DisplayConfig {
    /// Preview width to render at, or `None` when previews are off.
    #[must_use]
    pub fn active_preview_cols(&self) -> Option<u32> {
        self.preview.then_some(self.preview_cols.max(1))
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview: true,
            preview_cols: default_preview_cols(),
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_max_concurrent_loads() -> usize {
    4
}

fn default_downscale_width() -> u32 {
    400
}

fn default_preview_cols() -> u32 {
    64
}

fn default_true() -> bool {
    true
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(root) = &args.root {
            self.store_root = Some(root.clone());
        }
        if let Some(capacity) = args.cache_capacity {
            self.cache.capacity = capacity;
        }
        if let Some(downscale_width) = args.downscale_width {
            self.cache.downscale_width = downscale_width;
        }
        if let Some(preview) = args.preview {
            self.display.preview = preview;
        }
        if let Some(preview_cols) = args.preview_cols {
            self.display.preview_cols = preview_cols;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("oxiview.log"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            store_root: None,
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_with_sections() {
        let toml_content = r#"
            log_level = "debug"
            store_root = "/srv/images"

            [cache]
            capacity = 8
            downscale_width = 0

            [display]
            preview = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.store_root, Some(PathBuf::from("/srv/images")));
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.cache.max_concurrent_loads, 4);
        assert!(!config.display.preview);
        assert_eq!(config.display.preview_cols, 64);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.store_root, None);
        assert_eq!(config.cache.capacity, DEFAULT_CACHE_CAPACITY);
        assert!(config.display.preview); // default_true
    }

    #[test]
    fn test_merge_with_args_overrides_file_values() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            root: Some(PathBuf::from("/tmp/pics")),
            images: vec!["car.png".into()],
            config: None,
            log_path: None,
            log_level: Some(LogLevel::Trace),
            cache_capacity: Some(4),
            downscale_width: None,
            preview: Some(false),
            preview_cols: None,
            eager: false,
            prefetch: false,
            repeat: None,
        };

        config.merge_with_args(&args);

        assert_eq!(config.store_root, Some(PathBuf::from("/tmp/pics")));
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.cache.capacity, 4);
        assert!(!config.display.preview);
        assert_eq!(config.display.active_preview_cols(), None);
    }

    #[test]
    fn test_zero_downscale_disables_resizing() {
        let config = CacheConfig {
            downscale_width: 0,
            ..CacheConfig::default()
        };

        assert_eq!(config.loader_config().downscale_width, None);
        assert_eq!(
            CacheConfig::default().loader_config().downscale_width,
            Some(400)
        );
    }
}
