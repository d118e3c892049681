//! Rate limiting middleware configuration helpers
//!
//! Provides configuration for different rate limit settings:
//! - Login endpoint: 5 requests per minute per IP
//! - General API endpoints: 100 requests per minute per IP
//! - Health check: Exempt from rate limiting
//!
//! Counters live in an [`InMemoryBackend`]. Create one backend per limit
//! outside the `HttpServer` factory closure and clone it in, otherwise each
//! worker keeps its own counters and the effective limit multiplies.

use std::time::Duration;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;

/// Shared counter storage for one rate limit group.
pub fn rate_limit_backend() -> InMemoryBackend {
    InMemoryBackend::builder().build()
}

/// Configuration for login endpoint rate limiting.
/// Limits: 5 requests per 60 seconds per IP address.
pub fn auth_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 5).real_ip_key()
}

/// Configuration for general API endpoint rate limiting.
/// Limits: 100 requests per 60 seconds per IP address.
pub fn api_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 100).real_ip_key()
}
