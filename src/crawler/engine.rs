//! Breadth-first traversal over the code hierarchy
//!
//! The engine drives a FIFO queue seeded with the root codes. Each iteration
//! dequeues a code, fetches its page through the rate-limited fetcher,
//! classifies it as parent or leaf, and either enqueues the discovered
//! children or accumulates the dosage rows. Appending children to the back
//! of the queue yields breadth-first order, so shallower codes are
//! registered before deeper ones when ties exist.

use crate::config::{validate_roots, CrawlConfig};
use crate::crawler::accumulator::{Accumulator, Harvest};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::{parser, tables};
use crate::model::CodeRecord;
use crate::ConfigError;
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Traversal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Done,
}

/// Queue-based breadth-first walker over the code hierarchy
pub struct Engine {
    base_url: Url,
    max_codes: Option<usize>,
    queue: VecDeque<String>,
    visited: HashSet<String>,
    phase: Phase,
    accumulator: Accumulator,
}

impl Engine {
    /// Validates the roots and seeds the traversal queue
    ///
    /// Root validation is the fail-fast gate: an invalid root fails the whole
    /// invocation here, before any network activity.
    pub fn new(config: &CrawlConfig) -> Result<Self, ConfigError> {
        validate_roots(&config.roots)?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", config.base_url, e)))?;

        Ok(Self {
            base_url,
            max_codes: config.max_codes,
            queue: config.roots.iter().cloned().collect(),
            visited: HashSet::new(),
            phase: Phase::Idle,
            accumulator: Accumulator::default(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs the traversal to completion and returns the finished tables
    ///
    /// A single node's failure never aborts the run: it is logged and the
    /// loop continues with the next queued code. Hitting the code ceiling is
    /// a normal termination, not an error.
    pub async fn run(mut self, fetcher: &mut Fetcher) -> Harvest {
        self.phase = Phase::Running;
        let mut processed = 0usize;
        let mut failed = 0usize;

        loop {
            if let Some(max) = self.max_codes {
                if processed >= max {
                    tracing::info!("Code ceiling of {} reached, stopping traversal", max);
                    break;
                }
            }

            let code = match self.queue.pop_front() {
                Some(code) => code,
                None => break,
            };

            // A revisit is a no-op and does not count toward the ceiling.
            if !self.visited.insert(code.clone()) {
                continue;
            }
            processed += 1;

            if let Err(e) = self.process_code(&code, fetcher).await {
                failed += 1;
                tracing::warn!("Skipping {}: {}", code, e);
            }
        }

        self.phase = Phase::Done;
        tracing::info!(
            "Traversal done: {} codes processed, {} failed, {} left in queue",
            processed,
            failed,
            self.queue.len()
        );

        self.accumulator.finish()
    }

    /// Fetches, classifies, and harvests a single code's page
    async fn process_code(&mut self, code: &str, fetcher: &mut Fetcher) -> crate::Result<()> {
        let url = self.page_url(code);
        let body = fetcher.fetch(url.as_str()).await?;

        // Always a fresh parse; only raw bytes ever cross call boundaries.
        let document = Html::parse_document(&body);

        if tables::is_leaf(&document) {
            match tables::parse_dose_table(&document) {
                Some(rows) if !rows.is_empty() => {
                    tracing::debug!("Leaf {}: {} dose rows", code, rows.len());
                    for row in rows {
                        self.accumulator.add_code(CodeRecord {
                            code: row.code.clone(),
                            name: row.name.clone(),
                        });
                        self.accumulator.add_dose(row.into_record(code));
                    }
                }
                _ => {
                    // Register the leaf itself so the code is not lost.
                    tracing::warn!("Leaf {} had no extractable dose rows", code);
                    self.accumulator.add_code(CodeRecord {
                        code: code.to_string(),
                        name: None,
                    });
                }
            }
        } else {
            let children = parser::parse_children(&document, code, &self.base_url);
            tracing::debug!("Parent {}: {} children", code, children.len());
            for child in children {
                // Dedup against visited before enqueueing to bound queue growth.
                if !self.visited.contains(&child.code) {
                    self.queue.push_back(child.code.clone());
                }
                self.accumulator.add_code(child);
            }
        }

        Ok(())
    }

    /// Builds the page URL for a code
    fn page_url(&self, code: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("code", code)
            .append_pair("showdescription", "no");
        url
    }
}
