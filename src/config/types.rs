//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and library configuration.

use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::*;
use crate::error_handling::ConfigError;
use crate::models::Category;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured cards on stdout
    Plain,
    /// One JSON document on stdout
    Json,
}

/// Scoring thresholds used by the analyzers.
///
/// These are reasonable defaults, not measured constants; callers may tune
/// them per run. Rule weights stay fixed so scores remain comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Load time considered excellent
    pub load_time_good: Duration,
    /// Load time beyond which the page fails the check
    pub load_time_acceptable: Duration,
    /// Transfer size considered light
    pub page_size_good_bytes: usize,
    /// Transfer size beyond which the page fails the check
    pub page_size_max_bytes: usize,
    /// Referenced resource count considered light
    pub request_count_good: usize,
    /// Referenced resource count beyond which the page fails the check
    pub request_count_max: usize,
    /// Accepted title length (characters, inclusive)
    pub title_chars: (usize, usize),
    /// Accepted meta description length (characters, inclusive)
    pub description_chars: (usize, usize),
    /// Minimum touch target edge (CSS px)
    pub min_touch_target_px: f32,
    /// Base font size below which the check fails (CSS px)
    pub min_font_size_px: f32,
    /// Base font size below which the check warns (CSS px)
    pub recommended_font_size_px: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            load_time_good: LOAD_TIME_GOOD,
            load_time_acceptable: LOAD_TIME_ACCEPTABLE,
            page_size_good_bytes: PAGE_SIZE_GOOD_BYTES,
            page_size_max_bytes: PAGE_SIZE_MAX_BYTES,
            request_count_good: REQUEST_COUNT_GOOD,
            request_count_max: REQUEST_COUNT_MAX,
            title_chars: (TITLE_MIN_CHARS, TITLE_MAX_CHARS),
            description_chars: (DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS),
            min_touch_target_px: MIN_TOUCH_TARGET_PX,
            min_font_size_px: MIN_FONT_SIZE_PX,
            recommended_font_size_px: RECOMMENDED_FONT_SIZE_PX,
        }
    }
}

impl Thresholds {
    /// Checks that every threshold pair is ordered and non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.load_time_good.is_zero() || self.load_time_good > self.load_time_acceptable {
            return Err(ConfigError::InvalidThreshold(
                "load_time_good must be non-zero and <= load_time_acceptable".to_string(),
            ));
        }
        if self.page_size_good_bytes == 0 || self.page_size_good_bytes > self.page_size_max_bytes
        {
            return Err(ConfigError::InvalidThreshold(
                "page_size_good_bytes must be non-zero and <= page_size_max_bytes".to_string(),
            ));
        }
        if self.request_count_good > self.request_count_max {
            return Err(ConfigError::InvalidThreshold(
                "request_count_good must be <= request_count_max".to_string(),
            ));
        }
        if self.title_chars.0 > self.title_chars.1
            || self.description_chars.0 > self.description_chars.1
        {
            return Err(ConfigError::InvalidThreshold(
                "copy length ranges must be ordered (min <= max)".to_string(),
            ));
        }
        if self.min_font_size_px > self.recommended_font_size_px {
            return Err(ConfigError::InvalidThreshold(
                "min_font_size_px must be <= recommended_font_size_px".to_string(),
            ));
        }
        Ok(())
    }
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use site_check::Config;
///
/// let config = Config {
///     timeout_seconds: 5,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Report format
    pub output: OutputFormat,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Categories to analyze
    pub categories: Vec<Category>,

    /// Scoring thresholds
    pub thresholds: Thresholds,

    /// Overall score below which the CLI exits with a failure status
    pub min_score: Option<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            output: OutputFormat::Plain,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            categories: Category::ALL.to_vec(),
            thresholds: Thresholds::default(),
            min_score: None,
        }
    }
}

impl Config {
    /// Validates the configuration before any network resource is created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_TIMEOUT_SECS {
            return Err(ConfigError::TimeoutOutOfRange {
                got: self.timeout_seconds,
                max: MAX_TIMEOUT_SECS,
            });
        }
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        if let Some(min_score) = self.min_score {
            if min_score > 100 {
                return Err(ConfigError::MinScoreOutOfRange(min_score));
            }
        }
        self.thresholds.validate()
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
