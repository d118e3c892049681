use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::repos::orders::{self, Order};
use crate::state::app_state::AppState;

/// A resource type that can be ownership-checked from a route path key.
///
/// Each implementation binds the path parameter name, the error codes
/// for a malformed key and a missing resource, a keyed lookup, and the
/// owning user id. Guards never compare field-name strings; ownership
/// is expressed per type.
#[async_trait]
pub trait OwnedResource: Sized + 'static {
    /// Route path parameter holding the resource key.
    const ID_PARAM: &'static str;
    /// Error code for a malformed or missing key.
    const INVALID_ID: ErrorCode;
    /// Error code when no resource carries the key.
    const NOT_FOUND: ErrorCode;

    async fn find_by_key(db: &DatabaseConnection, key: i64) -> Result<Option<Self>, AppError>;

    fn owner_id(&self) -> i64;
}

#[async_trait]
impl OwnedResource for Order {
    const ID_PARAM: &'static str = "order_number";
    const INVALID_ID: ErrorCode = ErrorCode::InvalidOrderNumber;
    const NOT_FOUND: ErrorCode = ErrorCode::OrderNotFound;

    async fn find_by_key(db: &DatabaseConnection, key: i64) -> Result<Option<Self>, AppError> {
        Ok(orders::find_by_order_number(db, key).await?)
    }

    fn owner_id(&self) -> i64 {
        self.customer_id
    }
}

/// Ownership-guarded resource extractor.
///
/// Always fetches before deciding, so a missing resource reads as 404
/// for every identity, admin included. Admins bypass only the owner
/// comparison; a present resource owned by someone else is 403
/// `NOT_RESOURCE_OWNER`. The fetched resource rides along to the
/// handler, which therefore never fetches twice.
pub struct Owned<R> {
    pub user: CurrentUser,
    pub resource: R,
}

impl<R: OwnedResource> FromRequest for Owned<R> {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user_fut = CurrentUser::from_request(req, payload);
        let req = req.clone();

        Box::pin(async move {
            let user = user_fut.await?;

            let raw = req.match_info().get(R::ID_PARAM).ok_or_else(|| {
                AppError::bad_request(R::INVALID_ID, format!("Missing {} parameter", R::ID_PARAM))
            })?;

            let key = raw.parse::<i64>().map_err(|_| {
                AppError::bad_request(R::INVALID_ID, format!("Invalid {}: {raw}", R::ID_PARAM))
            })?;
            if key <= 0 {
                return Err(AppError::bad_request(
                    R::INVALID_ID,
                    format!("{} must be positive, got: {key}", R::ID_PARAM),
                ));
            }

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;
            let db = require_db(app_state)?;

            // Fetch before any bypass: absence must look identical to
            // admin and owner.
            let resource = R::find_by_key(db, key)
                .await?
                .ok_or_else(|| AppError::not_found(R::NOT_FOUND, "Resource not found"))?;

            if !user.is_admin() && resource.owner_id() != user.id {
                return Err(AppError::forbidden_with_code(
                    ErrorCode::NotResourceOwner,
                    "You do not own this resource",
                ));
            }

            Ok(Owned { user, resource })
        })
    }
}
