use std::convert::Infallible;
use hyper::StatusCode;
use crate::errors::GatewayError;


pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<GatewayError>() {
        match e {
            GatewayError::InvalidReference(_) => (StatusCode::BAD_REQUEST, e.to_string()),
            GatewayError::Forbidden(_) => (StatusCode::FORBIDDEN, e.to_string()),
            // Upstream details stay in the server log, not the response
            GatewayError::UpstreamFetchFailed(_) => {
                (StatusCode::BAD_GATEWAY, "Failed to fetch image".to_string())
            }
            GatewayError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, e.to_string()),
        }
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid or missing URL".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    let body = warp::reply::json(&serde_json::json!({ "error": message }));
    Ok(warp::reply::with_status(body, code))
}
