//! Logging helpers: PII redaction and security event lines.

pub mod pii;
pub mod security;
