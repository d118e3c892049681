use sea_orm::ConnectionTrait;
use tracing::{debug, info, warn};

use crate::adapters::users_sea::UserProfileUpdate;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{self, User};

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 100;

/// Redacts an auth subject value for logging purposes.
/// Shows only the first 4 characters followed by asterisks. The prefix is
/// cut on a char boundary; the subject is caller-supplied and not ASCII.
fn redact_sub(sub: &str) -> String {
    match sub.char_indices().nth(4) {
        Some((i, _)) => format!("{}***", &sub[..i]),
        None => "*".repeat(sub.chars().count()),
    }
}

/// Current identity's profile, with the email pulled from credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user: User,
    pub email: Option<String>,
}

/// Ensures a user exists for the upstream identity provider's subject,
/// creating one if necessary. Idempotent: repeating the call with the same
/// email and subject returns the same user without creating duplicates.
/// An existing email bound to a different subject is a conflict.
pub async fn ensure_login(
    email: &str,
    name: Option<&str>,
    auth_sub: &str,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<User, AppError> {
    let email = normalize_email(email)?;

    let auth_sub = auth_sub.trim();
    if auth_sub.is_empty() {
        return Err(AppError::bad_request(
            ErrorCode::InvalidAuthSub,
            "Auth subject must not be empty",
        ));
    }

    match users::find_credentials_by_email(conn, &email).await? {
        Some(credentials) => {
            let user = users::find_user_by_id(conn, credentials.user_id)
                .await?
                .ok_or_else(|| AppError::internal("Credentials row without a user"))?;

            if user.sub != auth_sub {
                warn!(
                    user_id = user.id,
                    email = %Redacted(&email),
                    incoming_sub = %redact_sub(auth_sub),
                    existing_sub = %redact_sub(&user.sub),
                    "Auth subject mismatch detected"
                );
                security::login_failed("auth_sub_mismatch", Some(&email));
                return Err(AppError::conflict(
                    ErrorCode::AuthSubMismatch,
                    "This email is already linked to a different sign-in identity. Please use the original identity or contact support.",
                ));
            }

            users::touch_last_login(conn, credentials.id).await?;

            debug!(
                user_id = user.id,
                email = %Redacted(&email),
                "Repeat login for existing user"
            );

            Ok(user)
        }
        None => {
            let display_name = derive_name(name, &email);
            let (user, created) = users::ensure_user(conn, auth_sub, &display_name).await?;
            users::ensure_credentials(conn, user.id, &email).await?;

            if created {
                info!(
                    user_id = user.id,
                    email = %Redacted(&email),
                    sub = %redact_sub(auth_sub),
                    "First user creation"
                );
            }

            Ok(user)
        }
    }
}

/// Load the profile for an authenticated identity.
pub async fn get_profile(
    user_id: i64,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<UserProfile, AppError> {
    let user = users::find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;
    let credentials = users::find_credentials_by_user_id(conn, user_id).await?;

    Ok(UserProfile {
        user,
        email: credentials.map(|c| c.email),
    })
}

/// Apply a self-service profile update (name and/or phone).
pub async fn update_profile(
    user_id: i64,
    name: Option<&str>,
    phone: Option<&str>,
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<UserProfile, AppError> {
    let mut update = UserProfileUpdate::default();

    if let Some(name) = name {
        update.name = Some(validate_name(name)?);
    }
    if let Some(phone) = phone {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(AppError::validation("Phone must not be blank"));
        }
        update.phone = Some(phone.to_string());
    }

    if update.is_empty() {
        return Err(AppError::validation(
            "Provide at least one of name or phone to update",
        ));
    }

    let user = users::update_profile(conn, user_id, update).await?;
    let credentials = users::find_credentials_by_user_id(conn, user_id).await?;

    debug!(user_id = user.id, "Profile updated");

    Ok(UserProfile {
        user,
        email: credentials.map(|c| c.email),
    })
}

/// Normalize and lightly validate an email address (string-level only).
pub(crate) fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim();
    let well_formed = email.len() >= 3
        && email.len() <= 254
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        });

    if !well_formed {
        return Err(AppError::bad_request(
            ErrorCode::InvalidEmail,
            "Email must be a valid email address",
        ));
    }

    Ok(email.to_lowercase())
}

pub(crate) fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.len() < NAME_MIN_LEN || name.len() > NAME_MAX_LEN {
        return Err(AppError::validation(format!(
            "Name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Derives a display name from the provided name or the email local-part.
fn derive_name(name: Option<&str>, email: &str) -> String {
    if let Some(name) = name {
        let clean_name = name.trim();
        if !clean_name.is_empty() {
            return clean_name.to_string();
        }
    }

    // Fall back to the email local-part (before @)
    match email.split_once('@') {
        Some((local, _)) if !local.is_empty() => local.to_string(),
        _ => email.to_string(),
    }
}
