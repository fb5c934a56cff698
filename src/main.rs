use hyper::{Body, HeaderMap, Response, StatusCode};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use warp::Filter;
use image_gateway::{
    AppState,
    GatewayError,
    ProxyQuery,
    config::{AllowListPolicy, FETCH_TIMEOUT_SECS},
    services::{check_rate_limit, fetch_image},
    middleware::add_image_headers,
    handlers::handle_rejection,
};

#[tokio::main]
async fn main() {
    let state = Arc::new(RwLock::new(AppState::new()));
    let policy = Arc::new(AllowListPolicy::default());
    let state_filter = warp::any().map(move || state.clone());
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .expect("failed to build upstream HTTP client");

    let health_check = warp::path("health")
        .and(warp::get())
        .map(|| "OK");

    let proxy = warp::path!("proxy" / "image")
        .and(warp::get())
        .and(warp::query::<ProxyQuery>())
        .and(warp::header::headers_cloned())
        .and(state_filter)
        .and_then(move |query: ProxyQuery,
                       headers: HeaderMap,
                       state: Arc<RwLock<AppState>>| {
            let client = client.clone();
            let policy = policy.clone();
            async move {
                let start_time = SystemTime::now();

                if !check_rate_limit(&state, &headers).await {
                    return Err(warp::reject::custom(GatewayError::RateLimitExceeded));
                }

                let (payload, content_type) =
                    fetch_image(&state, &policy, &client, &query.url)
                        .await
                        .map_err(|e| {
                            eprintln!("Proxy error: {}", e);
                            warp::reject::custom(e)
                        })?;

                let mut response = Response::builder()
                    .status(StatusCode::OK)
                    .header("content-type", content_type)
                    .body(Body::from(payload))
                    .unwrap();

                add_image_headers(response.headers_mut());

                if let Ok(duration) = start_time.elapsed() {
                    println!(
                        "GET /proxy/image {} {}ms",
                        response.status(),
                        duration.as_millis()
                    );
                }

                Ok::<_, warp::Rejection>(response)
            }
        });

    let routes = health_check
        .or(proxy)
        .recover(handle_rejection);

    println!("Image gateway running on http://127.0.0.1:3030");
    warp::serve(routes).run(([127, 0, 0, 1], 3030)).await;
}
