//! Larkstore backend library.
//!
//! `main.rs` wires these pieces into the server; integration suites link
//! against this crate and drive the same handlers in process.

#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

// Flat re-exports of the types most callers need.
pub use auth::jwt::{mint_access_token, verify_access_token};
pub use auth::{AccessClaims, Role};
pub use config::db::{db_url, DbOwner, DbProfile};
pub use error::AppError;
pub use errors::ErrorCode;
pub use extractors::current_user::CurrentUser;
pub use extractors::owned::{Owned, OwnedResource};
pub use extractors::role_guard::AdminUser;
pub use extractors::validated_json::ValidatedJson;
pub use infra::db::connect_db;
pub use middleware::bearer_auth::BearerAuth;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::security_headers::SecurityHeaders;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Unit tests log through the same subscriber as the integration suites.
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
