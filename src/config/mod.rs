//! Configuration module for ATC-Harvest
//!
//! A run is configured either entirely from CLI flags or from a TOML file
//! with per-flag overrides. Validation runs before any I/O.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{CrawlConfig, DEFAULT_BASE_URL, DEFAULT_ROOTS};
pub use validation::{validate, validate_roots};
