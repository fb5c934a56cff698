use crate::models::{AppState, CacheEntry};
use crate::config::{
    AllowListPolicy, ReferenceEncoding, CACHE_CAPACITY, CACHE_TTL_SECS, DEFAULT_CONTENT_TYPE,
    RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW_SECS,
};
use crate::errors::GatewayError;
use std::sync::Arc;
use tokio::sync::RwLock;
use hyper::HeaderMap;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use url::Url;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::time::{SystemTime, Duration};


pub fn decode_reference(raw: &str, encoding: ReferenceEncoding) -> Result<String, GatewayError> {
    match encoding {
        ReferenceEncoding::Plain => Ok(raw.to_string()),
        ReferenceEncoding::Base64 => {
            let decoded = STANDARD
                .decode(raw)
                .map_err(|e| GatewayError::InvalidReference(e.to_string()))?;
            String::from_utf8(decoded).map_err(|e| GatewayError::InvalidReference(e.to_string()))
        }
    }
}

pub fn validate_reference(raw: &str, policy: &AllowListPolicy) -> Result<Url, GatewayError> {
    let decoded = decode_reference(raw, policy.encoding)?;

    let url = Url::parse(&decoded).map_err(|e| GatewayError::InvalidReference(e.to_string()))?;

    if url.scheme() != policy.scheme {
        return Err(GatewayError::Forbidden(format!(
            "scheme '{}' is not allowed",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if policy.allowed_hosts.contains(host) => {}
        _ => return Err(GatewayError::Forbidden("host is not allowed".to_string())),
    }

    if decoded.len() > policy.max_url_len {
        return Err(GatewayError::InvalidReference(format!(
            "URL exceeds {} characters",
            policy.max_url_len
        )));
    }

    Ok(url)
}

pub async fn get_cached_image(
    state: &Arc<RwLock<AppState>>,
    cache_key: &str,
) -> Option<(Bytes, String)> {
    let state = state.read().await;
    if let Some(entry) = state.cache.get(cache_key) {
        if let Ok(age) = SystemTime::now().duration_since(entry.inserted_at) {
            // Lazy expiry: entries past their TTL are treated as absent
            if age < Duration::from_secs(CACHE_TTL_SECS) {
                return Some((entry.payload.clone(), entry.content_type.clone()));
            }
        }
    }
    None
}

pub async fn cache_image(
    state: &Arc<RwLock<AppState>>,
    cache_key: &str,
    payload: Bytes,
    content_type: String,
) {
    let mut state = state.write().await;

    if !state.cache.contains_key(cache_key) && state.cache.len() >= CACHE_CAPACITY {
        let now = SystemTime::now();
        let ttl = Duration::from_secs(CACHE_TTL_SECS);
        state.cache.retain(|_, entry| {
            matches!(now.duration_since(entry.inserted_at), Ok(age) if age < ttl)
        });

        if state.cache.len() >= CACHE_CAPACITY {
            let oldest = state
                .cache
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                state.cache.remove(&key);
            }
        }
    }

    state.cache.insert(
        cache_key.to_string(),
        CacheEntry {
            payload,
            content_type,
            inserted_at: SystemTime::now(),
        },
    );
}

pub async fn check_rate_limit(state: &Arc<RwLock<AppState>>, headers: &HeaderMap) -> bool {
    let mut state = state.write().await;
    let client_ip = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown");

    let now = SystemTime::now();
    let rate_limit = state.rate_limits.entry(client_ip.to_string())
        .and_modify(|rl| {
            if let Ok(duration) = now.duration_since(rl.window_start) {
                if duration.as_secs() >= RATE_LIMIT_WINDOW_SECS {
                    rl.count = 1;
                    rl.window_start = now;
                } else {
                    rl.count += 1;
                }
            }
        })
        .or_insert_with(|| crate::models::RateLimit {
            count: 1,
            window_start: now,
        });

    rate_limit.count <= RATE_LIMIT_REQUESTS
}

pub async fn fetch_image(
    state: &Arc<RwLock<AppState>>,
    policy: &AllowListPolicy,
    client: &reqwest::Client,
    raw: &str,
) -> Result<(Bytes, String), GatewayError> {
    let url = validate_reference(raw, policy)?;
    let cache_key = url.to_string();

    if let Some(cached) = get_cached_image(state, &cache_key).await {
        return Ok(cached);
    }

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| GatewayError::UpstreamFetchFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(GatewayError::UpstreamFetchFailed(format!(
            "upstream returned {}",
            response.status()
        )));
    }

    if let Some(len) = response.content_length() {
        if len > policy.max_body_bytes as u64 {
            return Err(GatewayError::UpstreamFetchFailed(format!(
                "upstream declared {} bytes, limit is {}",
                len, policy.max_body_bytes
            )));
        }
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let mut payload = BytesMut::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| GatewayError::UpstreamFetchFailed(e.to_string()))?;
        if payload.len() + chunk.len() > policy.max_body_bytes {
            // Abort the transfer, never cache a truncated payload
            return Err(GatewayError::UpstreamFetchFailed(format!(
                "upstream response exceeded {} bytes",
                policy.max_body_bytes
            )));
        }
        payload.extend_from_slice(&chunk);
    }
    let payload = payload.freeze();

    cache_image(state, &cache_key, payload.clone(), content_type.clone()).await;

    Ok((payload, content_type))
}
