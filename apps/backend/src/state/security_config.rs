use std::fmt;

use jsonwebtoken::Algorithm;

/// Token signing and verification settings.
///
/// One instance is built at startup from `BACKEND_JWT_SECRET` and shared
/// through [`crate::state::AppState`]; tests construct their own with a
/// fixed secret.
#[derive(Clone)]
pub struct SecurityConfig {
    /// Shared secret for signing and verifying access tokens.
    pub jwt_secret: Vec<u8>,
    /// Signing algorithm. HS256 unless a test overrides it.
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}

// Manual impl so the secret can never leak through debug logging of
// AppState or error context.
impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
