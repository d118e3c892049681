use std::marker::PhantomData;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::auth::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;

/// Compile-time role list for a guarded route.
pub trait RoleSpec {
    const ALLOWED: &'static [Role];
}

/// The admin management surface.
pub struct AdminOnly;

impl RoleSpec for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Admin];
}

/// Identity that holds at least one of the roles in `S::ALLOWED`.
///
/// Extraction runs the identity load (memoized per request) and then a
/// pure set-intersection check. An empty intersection is 403
/// `INSUFFICIENT_ROLE`; a missing or unloadable identity keeps its own
/// 401/403 from `CurrentUser`.
pub struct RoleGuarded<S: RoleSpec> {
    pub user: CurrentUser,
    _spec: PhantomData<S>,
}

/// The only production role spec so far.
pub type AdminUser = RoleGuarded<AdminOnly>;

impl<S: RoleSpec> RoleGuarded<S> {
    pub fn into_inner(self) -> CurrentUser {
        self.user
    }
}

impl<S: RoleSpec + 'static> FromRequest for RoleGuarded<S> {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user_fut = CurrentUser::from_request(req, payload);

        Box::pin(async move {
            let user = user_fut.await?;

            if !user.has_any_role(S::ALLOWED) {
                return Err(AppError::forbidden_with_code(
                    ErrorCode::InsufficientRole,
                    "Insufficient role for this resource",
                ));
            }

            Ok(RoleGuarded {
                user,
                _spec: PhantomData,
            })
        })
    }
}
