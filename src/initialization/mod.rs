//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources the
//! engine needs before any work starts:
//! - Logger (plain or JSON output)
//! - HTTP probe client (with timeout and User-Agent)
//! - DNS resolver
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod resolver;

pub use client::init_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;
