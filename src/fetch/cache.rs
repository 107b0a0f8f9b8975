// src/fetch/cache.rs

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// On-disk HTTP response cache, keyed by request URL with a fixed TTL.
///
/// One file per entry; entry age comes from the file's modified time. A
/// stale or unreadable entry is treated as absent, to be overwritten by the
/// next `put`. Accessed by a single process performing requests strictly in
/// sequence.
pub struct HttpCache {
    dir: PathBuf,
    ttl: Duration,
}

impl HttpCache {
    /// Open the cache directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating cache directory {}", dir.display()))?;
        Ok(Self { dir, ttl })
    }

    /// Filename-safe encoding of the URL: bytes outside `[A-Za-z0-9.-]`
    /// become `_XX` hex escapes, so distinct URLs never collide.
    fn entry_path(&self, url: &str) -> PathBuf {
        let mut name = String::with_capacity(url.len());
        for b in url.bytes() {
            match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' => name.push(b as char),
                _ => name.push_str(&format!("_{:02x}", b)),
            }
        }
        self.dir.join(name)
    }

    /// Return the cached body for `url`, or `None` when missing or older
    /// than the TTL.
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(url);
        let meta = fs::metadata(&path).ok()?;
        let age = meta
            .modified()
            .ok()?
            .elapsed()
            .unwrap_or(Duration::MAX); // clock skew: treat as stale
        if age > self.ttl {
            debug!(%url, "stale cache entry");
            return None;
        }
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(%url, error = %e, "unreadable cache entry");
                None
            }
        }
    }

    /// Store the body for `url`, overwriting any previous entry.
    pub fn put(&self, url: &str, body: &[u8]) -> Result<()> {
        let path = self.entry_path(url);
        fs::write(&path, body).with_context(|| format!("writing cache entry {}", path.display()))
    }
}
