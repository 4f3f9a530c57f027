//! Crawler module for page fetching and hierarchy traversal
//!
//! This module contains the core harvesting logic, including:
//! - Rate-limited HTTP fetching with response caching
//! - Parent/leaf page classification and table extraction
//! - Breadth-first traversal over the code hierarchy
//! - Accumulation of the two output tables

mod accumulator;
mod engine;
mod fetcher;
mod parser;
mod tables;

pub use accumulator::{Accumulator, Harvest};
pub use engine::{Engine, Phase};
pub use fetcher::{Fetcher, USER_AGENT};
pub use parser::parse_children;
pub use tables::{is_leaf, parse_dose_table};

use crate::cache::CacheStore;
use crate::config::CrawlConfig;
use crate::Result;

/// Runs a complete harvest
///
/// This is the main entry point for a crawl. It will:
/// 1. Validate the configuration (fail-fast, before any I/O)
/// 2. Build the rate-limited fetcher over the given cache store
/// 3. Walk the hierarchy breadth-first from the configured roots
/// 4. Return the two finished tables
///
/// Per-node failures during the walk are logged and skipped; the returned
/// tables are complete up to those gaps.
pub async fn crawl(config: &CrawlConfig, cache: Box<dyn CacheStore>) -> Result<Harvest> {
    crate::config::validate(config)?;

    let mut fetcher = Fetcher::new(config, cache)?;
    let engine = Engine::new(config)?;

    Ok(engine.run(&mut fetcher).await)
}
