//! Configuration module for Reel-Ripple
//!
//! This module handles loading, merging, and validating configuration. The
//! effective configuration is the built-in defaults, overlaid by an optional
//! TOML file, overlaid by command-line flags.
//!
//! # Example
//!
//! ```no_run
//! use reel_ripple::config::{resolve_config, Overrides};
//! use std::path::Path;
//!
//! let (config, _hash) = resolve_config(Some(Path::new("reel-ripple.toml")), Overrides::default()).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, Overrides, QualityConfig, SourceConfig,
    UserAgentConfig, DEFAULT_BASE_URL, DEFAULT_ROOT, DEFAULT_USER_AGENT,
};
pub use validation::{validate, MAX_WORKERS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, resolve_config};
