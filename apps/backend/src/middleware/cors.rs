//! CORS policy for the storefront frontend.

use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// Dev fallback when no origin is configured. Deployments must set
/// `CORS_ALLOWED_ORIGINS` explicitly.
const DEV_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

/// Split a comma-separated origin list, dropping entries that cannot be
/// browser origins. "null" is rejected explicitly since some clients
/// send it for opaque origins.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

/// Build the CORS middleware from `CORS_ALLOWED_ORIGINS`.
///
/// The policy is an explicit allowlist: each origin is registered
/// individually, methods are limited to what the API serves, and the
/// trace headers are exposed so the frontend can surface them in bug
/// reports.
pub fn cors_middleware() -> Cors {
    let configured = parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
    let origins = if configured.is_empty() {
        DEV_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        configured
    };

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(&origin);
    }

    cors
}
