//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::adapters::users_sea::{CredentialsCreate, UserCreate, UserProfileUpdate};
use crate::auth::Role;
use crate::errors::domain::DomainError;

/// User domain model. Never carries credential material; the password
/// hash stays in `UserCredentials`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub sub: String,
    pub name: String,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// User credentials domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub password_hash: Option<String>,
    pub last_login: Option<time::OffsetDateTime>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_sub(conn, sub).await?;
    Ok(user.map(User::from))
}

/// Find or create the user for an external subject.
/// Returns the user and whether this call created it.
pub async fn ensure_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
    name: &str,
) -> Result<(User, bool), DomainError> {
    let (user, created) =
        users_adapter::ensure_user_by_sub(conn, UserCreate::new(sub, name)).await?;
    Ok((User::from(user), created))
}

pub async fn find_credentials_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<UserCredentials>, DomainError> {
    let credential = users_adapter::find_credentials_by_email(conn, email).await?;
    Ok(credential.map(UserCredentials::from))
}

pub async fn find_credentials_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<UserCredentials>, DomainError> {
    let credential = users_adapter::find_credentials_by_user_id(conn, user_id).await?;
    Ok(credential.map(UserCredentials::from))
}

/// Find or create credentials for the given email.
/// Returns the credentials and whether this call created them.
pub async fn ensure_credentials<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    email: &str,
) -> Result<(UserCredentials, bool), DomainError> {
    let (creds, created) =
        users_adapter::ensure_credentials_by_email(conn, CredentialsCreate::new(user_id, email))
            .await?;
    Ok((UserCredentials::from(creds), created))
}

pub async fn touch_last_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    credentials_id: i64,
) -> Result<(), DomainError> {
    users_adapter::touch_last_login(conn, credentials_id).await?;
    Ok(())
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    update: UserProfileUpdate,
) -> Result<User, DomainError> {
    let user = users_adapter::update_user_profile(conn, user_id, update).await?;
    Ok(User::from(user))
}

/// Delete a user row. Returns false when no row existed.
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DomainError> {
    let rows = users_adapter::delete_user(conn, user_id).await?;
    Ok(rows > 0)
}

// Conversions between SeaORM models and domain models

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            sub: model.sub,
            name: model.name,
            phone: model.phone,
            roles: Role::from_list(&model.roles),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<crate::entities::user_credentials::Model> for UserCredentials {
    fn from(model: crate::entities::user_credentials::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            email: model.email,
            password_hash: model.password_hash,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
