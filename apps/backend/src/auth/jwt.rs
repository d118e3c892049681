use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::AccessClaims;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Access token time-to-live in seconds (15 minutes).
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Mints a signed access token whose `iat` is `now` and whose `exp` lies
/// [`ACCESS_TOKEN_TTL_SECS`] later. The algorithm and secret come from the
/// security config, never from the token itself.
pub fn mint_access_token(
    sub: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = unix_seconds(now)?;
    let claims = AccessClaims {
        sub: sub.to_string(),
        iat,
        exp: iat + ACCESS_TOKEN_TTL_SECS,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verifies a token and returns its claims.
///
/// An expired token maps to `UNAUTHORIZED_EXPIRED_JWT`; a bad signature or
/// any other decode failure maps to `UNAUTHORIZED_INVALID_JWT`. The split
/// lets clients refresh on expiry instead of forcing a new login.
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<AccessClaims, AppError> {
    // Validation::new checks exp by default and pins the algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        if matches!(e.kind(), ErrorKind::ExpiredSignature) {
            AppError::unauthorized_expired_jwt()
        } else {
            AppError::unauthorized_invalid_jwt()
        }
    })
}

fn unix_seconds(t: SystemTime) -> Result<i64, AppError> {
    Ok(t.duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64)
}
