//! ATC-Harvest: a rate-limited scraper for the ATC/DDD classification index
//!
//! This crate walks the hierarchical ATC code index breadth-first from the
//! top-level anatomical groups down to leaf pages, and flattens the scattered
//! HTML tables into two relational tables: a code registry and a
//! defined-daily-dose registry.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod model;
pub mod output;

use thiserror::Error;

/// Main error type for ATC-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// A configuration error fails the whole invocation before any network
/// activity takes place.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid root code '{0}': roots must be non-empty and contain only A-Z and 0-9")]
    InvalidRoot(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Fetch-level errors, raised only after retries are exhausted
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Cache store errors
///
/// A store write failure is non-fatal: the crawl logs it and proceeds as if
/// the entry were uncached.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ATC-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for cache store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// Re-export commonly used types
pub use cache::{CacheStore, FsCacheStore, MemoryCacheStore};
pub use config::CrawlConfig;
pub use crawler::{Engine, Fetcher, Harvest};
pub use model::{CodeRecord, DoseRecord, DoseRow};
