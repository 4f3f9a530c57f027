//! Response cache keyed by request URL
//!
//! The fetcher stores raw response bytes here so repeated invocations never
//! re-download pages that were already retrieved. Entries have no expiry and
//! persist until externally cleared. Only raw bytes are cached, never parsed
//! documents; callers re-parse on every read.

use crate::StoreResult;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store of raw response bytes, keyed by the exact request URL
pub trait CacheStore {
    /// Looks up the cached bytes for a URL, `None` on a miss
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores the bytes for a URL, overwriting any previous entry
    fn put(&mut self, key: &str, bytes: &[u8]) -> StoreResult<()>;
}

/// Directory-backed cache store, one blob file per distinct URL
///
/// Blob files are named by the SHA-256 digest of the URL, so arbitrary URLs
/// never have to be escaped into filesystem-safe names. The store survives
/// process restarts; this design assumes a single writer per directory.
pub struct FsCacheStore {
    dir: PathBuf,
}

impl FsCacheStore {
    /// Opens (and creates if necessary) a cache directory
    pub fn new(dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.dir.join(format!("{digest}.html"))
    }
}

impl CacheStore for FsCacheStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match std::fs::read(self.blob_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        std::fs::write(self.blob_path(key), bytes)?;
        Ok(())
    }
}

/// In-memory cache store
///
/// Used as a constructor-injected double in tests and for one-shot runs that
/// should not leave blobs on disk.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
