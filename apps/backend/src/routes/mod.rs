use actix_web::web;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub mod auth;
pub mod customers;
pub mod health;
pub mod orders;

/// Configure application routes for tests and non-HttpServer contexts.
///
/// In production, `main.rs` wires these under scopes with additional
/// middleware (rate limiting, bearer auth). For tests we register the
/// same paths without those wrappers so that endpoint behavior can be
/// exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Auth and account routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Order routes: /api/orders/**
    cfg.service(web::scope("/api/orders").configure(orders::configure_routes));

    // Customer admin routes: /api/customers/**
    cfg.service(web::scope("/api/customers").configure(customers::configure_routes));
}

/// Render a timestamp for a JSON response body. RFC 3339, UTC.
pub(crate) fn fmt_timestamp(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_else(|_| t.to_string())
}
