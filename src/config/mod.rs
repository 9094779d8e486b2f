//! Configuration module.
//!
//! Runtime options, the filter configuration value, engine constants, and
//! the snapshot-swap handle that shares the filter configuration between
//! the passive listener and the active scanner.

pub mod constants;
mod shared;
mod types;

pub use constants::*;
pub use shared::ConfigHandle;
pub use types::{Config, FilterConfig, LogFormat, LogLevel};
