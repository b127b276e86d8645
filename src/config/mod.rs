//! Configuration module for Job-Relink
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every threshold, weight and keyword table used by the
//! rediscovery engine lives here so it can be recalibrated without code changes.
//!
//! # Example
//!
//! ```no_run
//! use job_relink::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("relink.toml")).unwrap();
//! println!("Politeness delay: {}ms", config.http.politeness_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApplicationConfig, ConfidenceConfig, Config, HttpConfig, RediscoveryConfig, ScoringConfig,
    VendorFallbackConfig, VocabularyConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
