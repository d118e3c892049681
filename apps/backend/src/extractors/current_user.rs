use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::claims::AccessClaims;
use crate::auth::roles::{has_any_role, Role};
use crate::db::require_db;
use crate::error::AppError;
use crate::repos::users;
use crate::state::app_state::AppState;

/// The authenticated identity for this request.
///
/// Built from the verified claims in request extensions (stored by the
/// BearerAuth middleware) plus a fresh lookup of the `users` row by
/// subject. Credential material never appears here; the lookup reads
/// only the `users` table and the password hash lives in
/// `user_credentials`.
///
/// The loaded identity is memoized in request extensions, so several
/// guards on one route share a single lookup. It is never cached
/// across requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub sub: String,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        has_any_role(&self.roles, allowed)
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Reuse the identity if an earlier guard on this request
            // already loaded it.
            if let Some(user) = req.extensions().get::<CurrentUser>() {
                return Ok(user.clone());
            }

            // Claims are stored by the BearerAuth middleware. Their
            // absence means the route is misconfigured or the header
            // never arrived; either way authentication is missing.
            let claims = req
                .extensions()
                .get::<AccessClaims>()
                .ok_or_else(AppError::unauthorized_missing_bearer)?
                .clone();

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;
            let db = require_db(app_state)?;

            // A valid token whose subject no longer resolves is a
            // revoked account, not a server fault.
            let user = users::find_user_by_sub(db, &claims.sub)
                .await?
                .ok_or_else(AppError::forbidden_user_not_found)?;

            let current = CurrentUser {
                id: user.id,
                sub: user.sub,
                roles: user.roles,
            };
            req.extensions_mut().insert(current.clone());
            Ok(current)
        })
    }
}
