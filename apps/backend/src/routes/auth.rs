use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::mint_access_token;
use crate::auth::Role;
use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::routes::fmt_timestamp;
use crate::services::users::{self, UserProfile};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub auth_sub: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub sub: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        let user = profile.user;
        Self {
            id: user.id,
            sub: user.sub,
            name: user.name,
            email: profile.email,
            phone: user.phone,
            roles: user.roles,
            created_at: fmt_timestamp(user.created_at),
            updated_at: fmt_timestamp(user.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
struct RolesResponse {
    roles: Vec<Role>,
}

/// Upstream-identity login: create or reuse the account for this
/// email/subject pair and hand back a short-lived access token.
pub async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let db = require_db(&app_state)?;

    let user =
        users::ensure_login(&payload.email, payload.name.as_deref(), &payload.auth_sub, db).await?;
    let token = mint_access_token(&user.sub, SystemTime::now(), &app_state.security)?;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

async fn get_user(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let profile = users::get_profile(current_user.id, db).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(profile)))
}

/// Roles come straight off the loaded identity; no extra query.
async fn get_roles(current_user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(RolesResponse {
        roles: current_user.roles,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

async fn update_me(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let db = require_db(&app_state)?;

    let profile = users::update_profile(
        current_user.id,
        payload.name.as_deref(),
        payload.phone.as_deref(),
        db,
    )
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(profile)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_public_routes(cfg);
    configure_protected_routes(cfg);
}

/// The login route, left outside the bearer guard in production.
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)));
}

/// Account routes that sit behind the bearer guard in production.
pub fn configure_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/user").route(web::get().to(get_user)));
    cfg.service(web::resource("/user/roles").route(web::get().to(get_roles)));
    cfg.service(web::resource("/me").route(web::patch().to(update_me)));
}
