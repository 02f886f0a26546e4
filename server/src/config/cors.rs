use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// CORS for the browser frontend. The caller identity header must be
/// allowed explicitly or preflights for ticket routes fail.
pub fn create_cors_layer(config: &Config) -> CorsLayer {
    let mut allow_headers = vec![header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN];
    match HeaderName::try_from(config.caller_id_header.as_str()) {
        Ok(name) => allow_headers.push(name),
        Err(e) => tracing::warn!(
            "CORS: Invalid caller id header '{}': {}",
            config.caller_id_header,
            e
        ),
    }

    CorsLayer::new()
        .allow_origin(parse_origins(&config.cors_allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(allow_headers)
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn parse_origins(origins_str: &str) -> AllowOrigin {
    let origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => {
                tracing::debug!("CORS: Allowing origin: {}", origin);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, allowing any origin");
        AllowOrigin::any()
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
        AllowOrigin::list(origins)
    }
}
