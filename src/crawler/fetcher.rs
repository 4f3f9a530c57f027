//! Rate-limited HTTP fetcher
//!
//! This module handles all HTTP requests for the crawl, including:
//! - Building the HTTP client with a descriptive user agent
//! - Enforcing the minimum inter-request delay
//! - Retry logic for transient failures
//! - Consulting and populating the response cache
//!
//! The last-request timestamp lives on the fetcher instance, not in ambient
//! global state, so independent runs in the same process cannot interfere.

use crate::cache::CacheStore;
use crate::config::CrawlConfig;
use crate::FetchError;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Fixed descriptive client identifier attached to every request
pub const USER_AGENT: &str = concat!(
    "atc-harvest/",
    env!("CARGO_PKG_VERSION"),
    " (code classification harvester)"
);

/// HTTP fetcher with a per-instance rate limiter and an injected cache
///
/// Cache hits return immediately and count neither against the rate limit
/// nor as network traffic. Cache misses wait out the remainder of the
/// minimum delay, issue the GET, and store the raw body bytes on success.
/// Only raw bytes are ever cached; callers parse a fresh document per call.
pub struct Fetcher {
    client: Client,
    cache: Box<dyn CacheStore>,
    min_delay: Duration,
    max_attempts: u32,
    last_request: Option<Instant>,
}

impl Fetcher {
    /// Builds the HTTP client and wraps the given cache store
    ///
    /// # Arguments
    ///
    /// * `config` - Delay, timeout, and retry settings
    /// * `cache` - Store consulted before, and populated after, each request
    pub fn new(config: &CrawlConfig, cache: Box<dyn CacheStore>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            cache,
            min_delay: Duration::from_millis(config.delay_ms),
            max_attempts: config.max_attempts.max(1),
            last_request: None,
        })
    }

    /// Fetches a URL, preferring the cache over the network
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The page body, from cache or freshly downloaded
    /// * `Err(FetchError)` - All attempts exhausted, or a final status >= 400
    pub async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        match self.cache.get(url) {
            Ok(Some(bytes)) => {
                tracing::debug!("Cache hit for {}", url);
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
            Ok(None) => {}
            // A broken cache read degrades to a miss; the page is refetched.
            Err(e) => tracing::warn!("Cache read failed for {}: {}", url, e),
        }

        let body = self.fetch_network(url).await?;

        if let Err(e) = self.cache.put(url, body.as_bytes()) {
            tracing::warn!("Cache write failed for {}: {}", url, e);
        }

        Ok(body)
    }

    /// Issues the GET with rate limiting and retries
    ///
    /// Transient failures (transport errors, 5xx statuses) are retried up to
    /// `max_attempts`; every attempt waits out the rate-limit slot first, so
    /// retries are spaced like ordinary requests. A 4xx status fails the
    /// fetch immediately.
    async fn fetch_network(&mut self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.wait_for_slot().await;
            self.last_request = Some(Instant::now());

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_server_error() && attempt < self.max_attempts {
                        tracing::warn!(
                            "HTTP {} for {} (attempt {}/{}), retrying",
                            status.as_u16(),
                            url,
                            attempt,
                            self.max_attempts
                        );
                        continue;
                    }

                    if status.as_u16() >= 400 {
                        return Err(FetchError::Http {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    match response.text().await {
                        Ok(body) => return Ok(body),
                        Err(e) => {
                            if attempt < self.max_attempts {
                                tracing::warn!(
                                    "Body read failed for {} (attempt {}/{}): {}",
                                    url,
                                    attempt,
                                    self.max_attempts,
                                    e
                                );
                                continue;
                            }
                            return Err(FetchError::Transport {
                                url: url.to_string(),
                                source: e,
                            });
                        }
                    }
                }
                Err(e) => {
                    if attempt < self.max_attempts {
                        tracing::warn!(
                            "Request failed for {} (attempt {}/{}): {}",
                            url,
                            attempt,
                            self.max_attempts,
                            e
                        );
                        continue;
                    }
                    if e.is_timeout() {
                        return Err(FetchError::Timeout {
                            url: url.to_string(),
                        });
                    }
                    return Err(FetchError::Transport {
                        url: url.to_string(),
                        source: e,
                    });
                }
            }
        }
    }

    /// Suspends until at least `min_delay` has passed since the last request
    async fn wait_for_slot(&self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                tokio::time::sleep(self.min_delay - elapsed).await;
            }
        }
    }
}
