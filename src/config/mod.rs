//! Configuration module for Deepsift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Running without a file uses [`Config::default`], which targets the public
//! search endpoint through a local Tor SOCKS proxy.
//!
//! # Example
//!
//! ```no_run
//! use deepsift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("deepsift.toml")).unwrap();
//! println!("Dispatch delay: {}ms", config.crawler.dispatch_delay_ms);
//! ```

mod parser;
mod types;
pub(crate) mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DrainPolicy, EndpointConfig, FailurePolicy, QueryConfig,
    SelectorConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
