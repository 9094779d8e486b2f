//! Configuration types and CLI options.
//!
//! This module defines the runtime `Config` struct used by the CLI and the
//! `FilterConfig` value that drives the discovery filter pipeline.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::constants::{
    DEFAULT_EXTENSION_BLACKLIST, DEFAULT_FUZZ_DICTIONARY, DEFAULT_SHORT_LINK_CHARSET,
    DEFAULT_SHORT_LINK_MAX_LENGTH, DEFAULT_SHORT_LINK_MIN_LENGTH, DEFAULT_STATUS_CODE_BLACKLIST,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT,
};

/// Logging level for the application.
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
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Runtime configuration for a scan run.
///
/// Parsed from the command line by the binary; constructible directly when
/// the engine is embedded as a library.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "urlhunter",
    about = "Discovers and confirms URLs for in-scope root domains by active probing"
)]
pub struct Config {
    /// File containing candidate URLs, one per line (`#` for comments)
    pub targets: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Run the dictionary fuzz attack against each confirmed URL
    #[arg(long)]
    pub fuzz: bool,

    /// Base URL to run the short-link brute-force enumeration against
    /// after the list scan completes
    #[arg(long)]
    pub brute_force: Option<String>,

    /// Path to a filter configuration JSON file; defaults are used when
    /// absent or unreadable
    #[arg(long)]
    pub filter_config: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: PathBuf::from("urls.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fuzz: false,
            brute_force: None,
            filter_config: None,
        }
    }
}

/// Filter configuration applied to every candidate discovery.
///
/// Loaded once at startup and replaceable atomically at runtime through
/// [`ConfigHandle`](crate::config::ConfigHandle): readers always observe a
/// complete old or new value, never a partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Hosts equal to or under any of these domains are rejected.
    pub domain_blacklist: Vec<String>,
    /// File extensions (lowercase, no dot) that are rejected.
    pub extension_blacklist: Vec<String>,
    /// Response status codes that are rejected.
    pub status_code_blacklist: Vec<u16>,
    /// Words appended to confirmed paths during a fuzz attack, in order.
    pub fuzz_dictionary: Vec<String>,
    /// Top-level toggle: fuzz automatically after each confirmed scan hit.
    pub auto_fuzz_enabled: bool,
    /// Top-level toggle for short-link brute-force enumeration.
    pub short_link_brute_enabled: bool,
    /// Ordered character set for short-link generation.
    pub short_link_charset: String,
    /// Minimum generated short-link length (>= 1).
    pub short_link_min_length: usize,
    /// Maximum generated short-link length (>= min).
    pub short_link_max_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            domain_blacklist: Vec::new(),
            extension_blacklist: DEFAULT_EXTENSION_BLACKLIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            status_code_blacklist: DEFAULT_STATUS_CODE_BLACKLIST.to_vec(),
            fuzz_dictionary: DEFAULT_FUZZ_DICTIONARY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            auto_fuzz_enabled: false,
            short_link_brute_enabled: false,
            short_link_charset: DEFAULT_SHORT_LINK_CHARSET.to_string(),
            short_link_min_length: DEFAULT_SHORT_LINK_MIN_LENGTH,
            short_link_max_length: DEFAULT_SHORT_LINK_MAX_LENGTH,
        }
    }
}

impl FilterConfig {
    /// Clamps the short-link length bounds into a valid state
    /// (`min >= 1`, `max >= min`).
    pub fn validate_lengths(&mut self) {
        if self.short_link_min_length == 0 {
            self.short_link_min_length = 1;
        }
        if self.short_link_max_length < self.short_link_min_length {
            self.short_link_max_length = self.short_link_min_length;
        }
    }
}
