pub mod error_shape;
pub mod extractor_role_guard;
pub mod rate_limiting;
pub mod security_headers;
