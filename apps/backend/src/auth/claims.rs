//! Backend-specific JWT claims used across the application.

use serde::{Deserialize, Serialize};

/// Claims carried in backend-issued access tokens and inserted into request
/// extensions by the authentication middleware.
///
/// Identity data (name, roles) is never trusted from the token, only the
/// subject; the identity extractor resolves everything else from the store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// External user identifier (users.sub)
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
