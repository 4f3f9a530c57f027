use serde::Deserialize;
use std::path::PathBuf;

/// The 14 top-level anatomical groups used when no roots are given
pub const DEFAULT_ROOTS: [&str; 14] = [
    "A", "B", "C", "D", "G", "H", "J", "L", "M", "N", "P", "R", "S", "V",
];

/// Default base endpoint of the public code index
pub const DEFAULT_BASE_URL: &str = "https://atcddd.fhi.no/atc_ddd_index/";

/// Configuration for a harvest run
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlConfig {
    /// Root codes seeding the traversal queue
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,

    /// Base endpoint queried with `?code=<CODE>&showdescription=no`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Minimum time between consecutive network requests (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Per-request HTTP timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per URL before a fetch counts as failed
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Ceiling on the number of processed codes; unset means unbounded
    #[serde(rename = "max-codes", default)]
    pub max_codes: Option<usize>,

    /// Directory holding the raw-response cache
    #[serde(rename = "cache-dir", default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory the CSV tables are written to
    #[serde(rename = "out-dir", default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            base_url: default_base_url(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            max_codes: None,
            cache_dir: default_cache_dir(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_roots() -> Vec<String> {
    DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./cache")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("./out")
}
