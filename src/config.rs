use std::collections::HashSet;
use lazy_static::lazy_static;

pub const ALLOWED_SCHEME: &str = "https";
pub const MAX_URL_LEN: usize = 512; // decoded reference length cap
pub const FETCH_TIMEOUT_SECS: u64 = 5;
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024; // 2MB limit
pub const CACHE_TTL_SECS: u64 = 3600; // 1 hour
pub const CACHE_CAPACITY: usize = 256; // max distinct cached URLs
pub const RATE_LIMIT_REQUESTS: u32 = 100; // requests per window
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60; // window size in seconds
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg"; // when upstream omits one

lazy_static! {
    pub static ref ALLOWED_HOSTS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("i.pravatar.cc");
        s.insert("www.gravatar.com");
        s.insert("secure.gravatar.com");
        s
    };
}

/// How the `url` query parameter is transported. One convention per
/// deployment; this deployment takes the URL verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceEncoding {
    Plain,
    Base64,
}

/// Validation policy for client-supplied image references. Built once at
/// startup, never mutated afterwards.
pub struct AllowListPolicy {
    pub allowed_hosts: HashSet<String>,
    pub scheme: String,
    pub max_url_len: usize,
    pub max_body_bytes: usize,
    pub encoding: ReferenceEncoding,
}

impl Default for AllowListPolicy {
    fn default() -> Self {
        Self {
            allowed_hosts: ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect(),
            scheme: ALLOWED_SCHEME.to_string(),
            max_url_len: MAX_URL_LEN,
            max_body_bytes: MAX_BODY_BYTES,
            encoding: ReferenceEncoding::Plain,
        }
    }
}
