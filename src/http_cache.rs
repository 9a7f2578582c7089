use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const CACHE_VERSION: u32 = 2;
const CACHE_DIR: &str = "flex_terminal";
const CACHE_FILE: &str = "http_cache.json";

static CACHE: Mutex<Option<HttpCacheFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HttpCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    fetched_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOrigin {
    Network,
    /// Served from disk because it was younger than the TTL.
    Fresh,
    /// Served from disk because the request failed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct CachedBody {
    pub body: String,
    pub origin: BodyOrigin,
}

/// GETs `url`, reusing a cached body younger than `ttl` and falling back to
/// an older one when the request fails. Errors only when there is nothing to
/// serve. A zero `ttl` forces a request but keeps the stale fallback.
pub fn fetch_json_cached(
    client: &Client,
    url: &str,
    extra_headers: &[(&str, &str)],
    ttl: Duration,
) -> Result<CachedBody> {
    let now = system_time_to_secs(SystemTime::now()).unwrap_or_default();
    let cached_entry = {
        let mut guard = lock_cache();
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(url).cloned()
    };

    let (served, fetched) = serve_body(url, cached_entry, now, ttl, || {
        fetch_body(client, url, extra_headers)
    })?;
    if let Some(entry) = fetched {
        store_entry(url, entry);
    }
    Ok(served)
}

// Returns the body to serve and, when the network answered, the entry to store.
fn serve_body(
    url: &str,
    cached_entry: Option<CacheEntry>,
    now: u64,
    ttl: Duration,
    fetch: impl FnOnce() -> Result<String>,
) -> Result<(CachedBody, Option<CacheEntry>)> {
    if let Some(entry) = cached_entry.as_ref() {
        if is_fresh(entry.fetched_at, now, ttl) {
            debug!(url, age_secs = now.saturating_sub(entry.fetched_at), "cache hit");
            let served = CachedBody {
                body: entry.body.clone(),
                origin: BodyOrigin::Fresh,
            };
            return Ok((served, None));
        }
    }

    match fetch() {
        Ok(body) => {
            let entry = CacheEntry {
                body: body.clone(),
                fetched_at: now,
            };
            let served = CachedBody {
                body,
                origin: BodyOrigin::Network,
            };
            Ok((served, Some(entry)))
        }
        Err(err) => match cached_entry {
            Some(entry) => {
                warn!(url, error = %err, "request failed, serving stale body");
                let served = CachedBody {
                    body: entry.body,
                    origin: BodyOrigin::Stale,
                };
                Ok((served, None))
            }
            None => Err(err),
        },
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn fetch_body(client: &Client, url: &str, extra_headers: &[(&str, &str)]) -> Result<String> {
    let mut req = client.get(url);
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }
    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}", status));
    }
    Ok(body)
}

fn is_fresh(fetched_at: u64, now: u64, ttl: Duration) -> bool {
    now >= fetched_at && now - fetched_at < ttl.as_secs()
}

fn lock_cache() -> std::sync::MutexGuard<'static, Option<HttpCacheFile>> {
    // A panic while holding the lock leaves plain data behind; keep using it.
    CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn store_entry(key: &str, entry: CacheEntry) {
    let mut guard = lock_cache();
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(key.to_string(), entry);
    if let Err(err) = save_cache_file(cache) {
        warn!(error = %err, "failed to persist http cache");
    }
}

fn load_cache_file() -> HttpCacheFile {
    let Some(path) = cache_path() else {
        return HttpCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return HttpCacheFile::default();
    };
    let cache = serde_json::from_str::<HttpCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return HttpCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &HttpCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, &path).context("swap http cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
