//! Bearer token authentication middleware.
//!
//! Verifies the `Authorization: Bearer <token>` header on protected routes and
//! stores the decoded [`AccessClaims`] in request extensions. Downstream
//! extractors read the claims from there; no identity lookup happens here.
//!
//! Failures are rendered as Problem Details through [`AppError`], with expired
//! tokens distinguished from tampered or malformed ones.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct BearerAuth;

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware { service }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Extract the Authorization header and AppState before moving req
        let auth_header = req.headers().get(header::AUTHORIZATION).cloned();
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        let token = match parse_bearer(auth_header.as_ref()) {
            Ok(token) => token,
            Err(err) => {
                return Box::pin(async move { Err(err.into()) });
            }
        };

        let app_state = match app_state {
            Some(state) => state,
            None => {
                return Box::pin(async {
                    Err(AppError::internal("AppState not available").into())
                });
            }
        };

        match verify_access_token(&token, &app_state.security) {
            Ok(claims) => {
                // Store claims in request extensions BEFORE calling the service
                req.extensions_mut().insert(claims);

                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}

/// Parse a token out of an `Authorization: Bearer <token>` header value.
///
/// Anything other than exactly `Bearer <non-empty-token>` is rejected as a
/// missing bearer; the scheme is matched case-sensitively.
fn parse_bearer(header_value: Option<&header::HeaderValue>) -> Result<String, AppError> {
    let auth_value = match header_value {
        Some(value) => value,
        None => return Err(AppError::unauthorized_missing_bearer()),
    };

    let auth_str = auth_value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::unauthorized_missing_bearer());
    }

    let token_str = parts[1];
    if token_str.is_empty() {
        return Err(AppError::unauthorized_missing_bearer());
    }

    Ok(token_str.to_string())
}
