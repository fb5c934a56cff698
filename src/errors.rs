use std::fmt;

#[derive(Debug)]
pub enum GatewayError {
    InvalidReference(String),
    Forbidden(String),
    UpstreamFetchFailed(String),
    RateLimitExceeded,
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidReference(e) => write!(f, "Invalid image reference: {}", e),
            Self::Forbidden(e) => write!(f, "Forbidden: {}", e),
            Self::UpstreamFetchFailed(e) => write!(f, "Upstream fetch failed: {}", e),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
        }
    }
}

impl warp::reject::Reject for GatewayError {}
