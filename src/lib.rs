//! Deepsift: a paginated search crawler for onion-routed endpoints
//!
//! This crate turns one search request into a bounded, deduplicated crawl of
//! the result pages of a fixed search endpoint, collecting result entries until
//! the total reported by the first page is reached.

pub mod config;
pub mod crawler;
pub mod output;
pub mod query;
pub mod state;

use thiserror::Error;

/// Main error type for Deepsift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error for {request}: {message}")]
    Transport { request: String, message: String },

    #[error("Parse error for {request}: {message}")]
    Parse { request: String, message: String },

    #[error("Nothing found for '{query}'")]
    NoResults { query: String },

    #[error("Output path error: {0}")]
    OutputPath(String),

    #[error("Crawl task failed: {0}")]
    TaskFailed(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Deepsift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, ResultEntry};
pub use query::{QueryBuilder, SearchRequest};
pub use state::CrawlState;
