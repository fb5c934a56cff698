use hyper::{HeaderMap, header::{HeaderName, HeaderValue}};
use crate::config::CACHE_TTL_SECS;

#[cfg(test)]
mod tests;
pub fn add_image_headers(headers: &mut HeaderMap) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", CACHE_TTL_SECS)) {
        headers.insert(HeaderName::from_static("cache-control"), value);
    }
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
}
