use actix_web::{test, web, HttpResponse};
use backend::{AppError, ErrorCode};
use serde_json::Value;

use crate::common::assert_problem_details_structure;
use crate::support::app_builder::create_test_app;
use crate::support::test_state_builder;

/// Test endpoint that returns a validation error (400)
async fn test_validation_error() -> Result<HttpResponse, AppError> {
    Err(AppError::validation("Field validation failed"))
}

/// Test endpoint that returns a bad request error (400)
async fn test_bad_request_error() -> Result<HttpResponse, AppError> {
    Err(AppError::bad_request(
        ErrorCode::BadRequest,
        "Invalid request format",
    ))
}

/// Test endpoint that returns a not found error (404)
async fn test_not_found_error() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found(
        ErrorCode::NotFound,
        "Resource not found",
    ))
}

/// Test endpoint that returns an unauthorized error (401)
async fn test_unauthorized_error() -> Result<HttpResponse, AppError> {
    Err(AppError::unauthorized())
}

/// Test endpoint that returns a forbidden error (403)
async fn test_forbidden_error() -> Result<HttpResponse, AppError> {
    Err(AppError::forbidden())
}

/// Test endpoint that returns a conflict error (409)
async fn test_conflict_error() -> Result<HttpResponse, AppError> {
    Err(AppError::conflict(
        ErrorCode::Conflict,
        "Resource already exists",
    ))
}

/// Test endpoint that returns a database error (500)
async fn test_db_error() -> Result<HttpResponse, AppError> {
    Err(AppError::db("Connection reset by peer"))
}

/// Test endpoint that returns a database unavailable error (503)
async fn test_db_unavailable_error() -> Result<HttpResponse, AppError> {
    Err(AppError::db_unavailable())
}

/// Test endpoint that returns a database timeout error (504)
async fn test_timeout_error() -> Result<HttpResponse, AppError> {
    Err(AppError::timeout("Query exceeded deadline"))
}

/// Test endpoint that returns an internal server error (500)
async fn test_internal_error() -> Result<HttpResponse, AppError> {
    Err(AppError::internal("Unexpected condition"))
}

fn test_error_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/_test/validation", web::get().to(test_validation_error))
        .route("/_test/bad_request", web::get().to(test_bad_request_error))
        .route("/_test/not_found", web::get().to(test_not_found_error))
        .route(
            "/_test/unauthorized",
            web::get().to(test_unauthorized_error),
        )
        .route("/_test/forbidden", web::get().to(test_forbidden_error))
        .route("/_test/conflict", web::get().to(test_conflict_error))
        .route("/_test/db", web::get().to(test_db_error))
        .route(
            "/_test/db_unavailable",
            web::get().to(test_db_unavailable_error),
        )
        .route("/_test/timeout", web::get().to(test_timeout_error))
        .route("/_test/internal", web::get().to(test_internal_error));
}

/// Every error variant must come back in the same problem+json shape,
/// with the status-specific headers the structure helper checks.
#[actix_web::test]
async fn test_all_error_responses_conform_to_problem_details(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = create_test_app(state)
        .with_routes(test_error_routes)
        .build()
        .await?;

    let error_cases = vec![
        (
            "/_test/validation",
            400,
            "VALIDATION_ERROR",
            "Field validation failed",
        ),
        (
            "/_test/bad_request",
            400,
            "BAD_REQUEST",
            "Invalid request format",
        ),
        ("/_test/not_found", 404, "NOT_FOUND", "Resource not found"),
        (
            "/_test/unauthorized",
            401,
            "UNAUTHORIZED",
            "Authentication required",
        ),
        ("/_test/forbidden", 403, "FORBIDDEN", "Access denied"),
        (
            "/_test/conflict",
            409,
            "CONFLICT",
            "Resource already exists",
        ),
        ("/_test/db", 500, "DB_ERROR", "Connection reset by peer"),
        (
            "/_test/db_unavailable",
            503,
            "DB_UNAVAILABLE",
            "Database unavailable",
        ),
        ("/_test/timeout", 504, "DB_TIMEOUT", "Query exceeded deadline"),
        ("/_test/internal", 500, "INTERNAL", "Unexpected condition"),
    ];

    for (path, status, code, detail) in error_cases {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_structure(resp, status, code, detail).await;
    }

    Ok(())
}

/// The title is the code with underscores spaced and words capitalized.
#[actix_web::test]
async fn test_title_is_humanized_code() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = create_test_app(state)
        .with_routes(test_error_routes)
        .build()
        .await?;

    let req = test::TestRequest::get().uri("/_test/validation").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Validation Error");

    let req = test::TestRequest::get()
        .uri("/_test/db_unavailable")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Db Unavailable");

    Ok(())
}

/// The type URI embeds the code so clients can link error docs.
#[actix_web::test]
async fn test_type_uri_embeds_code() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = create_test_app(state)
        .with_routes(test_error_routes)
        .build()
        .await?;

    let req = test::TestRequest::get().uri("/_test/not_found").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["type"], "https://larkstore.app/errors/NOT_FOUND");

    Ok(())
}

/// A caller-supplied x-request-id is reused when it is a valid UUID, so
/// upstream proxies can correlate their logs with problem bodies.
#[actix_web::test]
async fn test_inbound_request_id_is_reused() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = create_test_app(state)
        .with_routes(test_error_routes)
        .build()
        .await?;

    let inbound = "3b241101-e2bb-4255-8caf-4136c566a962";
    let req = test::TestRequest::get()
        .uri("/_test/not_found")
        .insert_header(("x-request-id", inbound))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let echoed = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert_eq!(echoed.as_deref(), Some(inbound));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["trace_id"], inbound);

    Ok(())
}

/// Anything that does not parse as a UUID is replaced with a fresh id.
#[actix_web::test]
async fn test_malformed_request_id_is_replaced() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = create_test_app(state)
        .with_routes(test_error_routes)
        .build()
        .await?;

    let req = test::TestRequest::get()
        .uri("/_test/not_found")
        .insert_header(("x-request-id", "../../etc/passwd"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let trace = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_default();
    assert_ne!(trace, "../../etc/passwd");
    assert_eq!(trace.len(), 36, "replacement id should be a hyphenated UUID");

    Ok(())
}
