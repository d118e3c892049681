use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, HttpMessage, HttpRequest, HttpResponse};
use backend::error::AppError;
use backend::middleware::bearer_auth::BearerAuth;
use backend::AccessClaims;
use backend_test_support::unique_helpers::unique_str;
use serde_json::Value;

use crate::support::app_builder::create_test_app;
use crate::support::auth::{bearer_header, mint_expired_token, mint_test_token};
use crate::support::{test_security_config, test_state_builder};

/// Echoes the claims the middleware stashed in request extensions.
async fn echo_claims(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let claims = req
        .extensions()
        .get::<AccessClaims>()
        .cloned()
        .ok_or_else(|| AppError::internal("claims missing from extensions"))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "sub": claims.sub,
        "iat": claims.iat,
        "exp": claims.exp,
    })))
}

async fn build_bearer_test_app(
    state: backend::state::app_state::AppState,
) -> Result<
    impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    AppError,
> {
    create_test_app(state)
        .with_routes(|cfg| {
            cfg.service(
                web::scope("/test-auth")
                    .wrap(BearerAuth)
                    .route("/me", web::get().to(echo_claims)),
            );
        })
        .build()
        .await
}

async fn call_and_capture_error<S>(
    app: &S,
    req: Request,
) -> Result<(StatusCode, String), actix_web::Error>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let err = app.call(req).await.expect_err("expected error response");
    let status = err.as_response_error().status_code();
    let detail = err.to_string();
    Ok((status, detail))
}

#[actix_web::test]
async fn test_missing_header() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let req = test::TestRequest::get().uri("/test-auth/me").to_request();

    let (status, detail) = call_and_capture_error(&app, req).await?;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "Unauthorized: UNAUTHORIZED_MISSING_BEARER");

    Ok(())
}

#[actix_web::test]
async fn test_wrong_scheme() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let req = test::TestRequest::get()
        .uri("/test-auth/me")
        .insert_header(("Authorization", "Token abc"))
        .to_request();

    let (status, detail) = call_and_capture_error(&app, req).await?;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "Unauthorized: UNAUTHORIZED_MISSING_BEARER");

    Ok(())
}

#[actix_web::test]
async fn test_lowercase_scheme_rejected() -> Result<(), Box<dyn std::error::Error>> {
    // The scheme comparison is exact; "bearer" is not "Bearer".
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let sub = unique_str("sub-lowercase");
    let token = mint_test_token(&sub, &test_security_config());
    let req = test::TestRequest::get()
        .uri("/test-auth/me")
        .insert_header(("Authorization", format!("bearer {token}")))
        .to_request();

    let (status, detail) = call_and_capture_error(&app, req).await?;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "Unauthorized: UNAUTHORIZED_MISSING_BEARER");

    Ok(())
}

#[actix_web::test]
async fn test_empty_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let req = test::TestRequest::get()
        .uri("/test-auth/me")
        .insert_header(("Authorization", "Bearer "))
        .to_request();

    let (status, detail) = call_and_capture_error(&app, req).await?;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "Unauthorized: UNAUTHORIZED_MISSING_BEARER");

    Ok(())
}

#[actix_web::test]
async fn test_extra_parts_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let req = test::TestRequest::get()
        .uri("/test-auth/me")
        .insert_header(("Authorization", "Bearer abc def"))
        .to_request();

    let (status, detail) = call_and_capture_error(&app, req).await?;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "Unauthorized: UNAUTHORIZED_MISSING_BEARER");

    Ok(())
}

#[actix_web::test]
async fn test_garbage_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let req = test::TestRequest::get()
        .uri("/test-auth/me")
        .insert_header(("Authorization", "Bearer not-a-real-token"))
        .to_request();

    let (status, detail) = call_and_capture_error(&app, req).await?;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "Unauthorized: UNAUTHORIZED_INVALID_JWT");

    Ok(())
}

#[actix_web::test]
async fn test_wrong_secret() -> Result<(), Box<dyn std::error::Error>> {
    // The app state carries the standard test secret; the token is
    // signed with a different one, so the signature check fails.
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let other_config =
        backend::state::security_config::SecurityConfig::new("another_secret_entirely".as_bytes());
    let sub = unique_str("sub-wrong-secret");
    let token = mint_test_token(&sub, &other_config);

    let req = test::TestRequest::get()
        .uri("/test-auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();

    let (status, detail) = call_and_capture_error(&app, req).await?;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "Unauthorized: UNAUTHORIZED_INVALID_JWT");

    Ok(())
}

#[actix_web::test]
async fn test_expired_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let sub = unique_str("sub-expired");
    let token = mint_expired_token(&sub, &test_security_config());

    let req = test::TestRequest::get()
        .uri("/test-auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();

    let (status, detail) = call_and_capture_error(&app, req).await?;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "Unauthorized: UNAUTHORIZED_EXPIRED_JWT");

    Ok(())
}

#[actix_web::test]
async fn test_valid_token_reaches_handler() -> Result<(), Box<dyn std::error::Error>> {
    // No db in the state: the middleware verifies tokens without one.
    let state = test_state_builder().build().await?;
    let app = build_bearer_test_app(state).await?;

    let sub = unique_str("sub-valid");
    let req = test::TestRequest::get()
        .uri("/test-auth/me")
        .insert_header((
            "Authorization",
            bearer_header(&sub, &test_security_config()),
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sub"], sub.as_str());
    let iat = body["iat"].as_i64().expect("iat should be an integer");
    let exp = body["exp"].as_i64().expect("exp should be an integer");
    assert!(exp > iat, "exp should be after iat");

    Ok(())
}
