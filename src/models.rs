use std::collections::HashMap;
use std::time::SystemTime;
use bytes::Bytes;
use serde::Deserialize;

pub struct CacheEntry {
    pub payload: Bytes,
    pub content_type: String,
    pub inserted_at: SystemTime,
}

pub struct RateLimit {
    pub count: u32,
    pub window_start: SystemTime,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            count: 0,
            window_start: SystemTime::now(),
        }
    }
}

/// Query parameters accepted by the proxy route.
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: String,
}

pub struct AppState {
    pub cache: HashMap<String, CacheEntry>,
    pub rate_limits: HashMap<String, RateLimit>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            rate_limits: HashMap::new(),
        }
    }
}
