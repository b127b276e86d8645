//! Job-Relink: rediscovery of decayed employment links
//!
//! This crate takes a dataset of per-organization records whose employment page
//! link is known or suspected broken, classifies each site's publishing platform,
//! generates replacement candidates, scores and validates them against live
//! content, and either rewrites the link or defers the record to human review.

pub mod config;
pub mod content;
pub mod crawler;
pub mod output;
pub mod rediscovery;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Job-Relink operations
#[derive(Debug, Error)]
pub enum RelinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

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

    #[error("Invalid pattern in config: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Job-Relink operations
pub type Result<T> = std::result::Result<T, RelinkError>;

// Re-export commonly used types
pub use config::Config;
pub use rediscovery::{Rediscoverer, RediscoveryResult};
pub use state::{Action, PageType, ValidationReason};
pub use storage::{Dataset, Record};
