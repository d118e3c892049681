use actix_web::test;
use backend::verify_access_token;
use backend_test_support::unique_helpers::{unique_email, unique_str};
use sea_orm::MockExecResult;
use serde_json::{json, Value};

use crate::common::assert_problem_details_structure;
use crate::support::app_builder::create_test_app;
use crate::support::factory::{credentials_row, customer_row};
use crate::support::state_builder_ext::StateBuilderTestExt;
use crate::support::{test_security_config, test_state_builder};

#[actix_web::test]
async fn test_login_rejects_invalid_email() -> Result<(), Box<dyn std::error::Error>> {
    // Validation runs before the first query, so the mock stays empty.
    let state = test_state_builder().with_mock_db().build().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    for bad in ["", "no-at-sign", "@example.com", "user@nodot"] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": bad, "auth_sub": "auth0|abc" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_problem_details_structure(
            resp,
            400,
            "INVALID_EMAIL",
            "Email must be a valid email address",
        )
        .await;
    }

    Ok(())
}

#[actix_web::test]
async fn test_login_rejects_blank_auth_sub() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().with_mock_db().build().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": unique_email("login"), "auth_sub": "   " }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "INVALID_AUTH_SUB", "Auth subject must not be empty")
        .await;

    Ok(())
}

#[actix_web::test]
async fn test_login_without_db_is_503() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state_builder().build().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": unique_email("login"), "auth_sub": "auth0|abc" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 503, "DB_UNAVAILABLE", "Database unavailable").await;

    Ok(())
}

#[actix_web::test]
async fn test_login_creates_new_user_and_returns_token() -> Result<(), Box<dyn std::error::Error>> {
    let sub = unique_str("auth0|new-user");
    let email = unique_email("new-user");
    let user = customer_row(41, &sub);
    let creds = credentials_row(61, user.id, &email);

    // No credentials for the email yet, so the service inserts the user
    // and the credentials, re-reading each row after its upsert.
    let state = test_state_builder()
        .with_mock_db_with_results(|mock| {
            mock.append_query_results([Vec::<backend::entities::user_credentials::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: user.id as u64,
                    rows_affected: 1,
                }])
                .append_query_results([vec![user.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: creds.id as u64,
                    rows_affected: 1,
                }])
                .append_query_results([vec![creds.clone()]])
        })
        .build()
        .await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "name": "Jane Doe", "auth_sub": sub }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token should be a string");
    let claims = verify_access_token(token, &test_security_config())?;
    assert_eq!(claims.sub, sub);

    Ok(())
}

#[actix_web::test]
async fn test_login_existing_user_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let sub = unique_str("auth0|repeat");
    let email = unique_email("repeat");
    let user = customer_row(42, &sub);
    let creds = credentials_row(62, user.id, &email);

    // Credentials exist and the stored subject matches: no inserts, just
    // a last_login touch (update with returning).
    let state = test_state_builder()
        .with_mock_db_with_results(|mock| {
            mock.append_query_results([vec![creds.clone()]])
                .append_query_results([vec![user.clone()]])
                .append_query_results([vec![creds.clone()]])
        })
        .build()
        .await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "auth_sub": sub }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token should be a string");
    let claims = verify_access_token(token, &test_security_config())?;
    assert_eq!(claims.sub, sub);

    Ok(())
}

#[actix_web::test]
async fn test_login_email_bound_to_other_subject_is_conflict(
) -> Result<(), Box<dyn std::error::Error>> {
    let email = unique_email("taken");
    let stored_sub = unique_str("auth0|original");
    let user = customer_row(43, &stored_sub);
    let creds = credentials_row(63, user.id, &email);

    let state = test_state_builder()
        .with_mock_db_with_results(|mock| {
            mock.append_query_results([vec![creds.clone()]])
                .append_query_results([vec![user.clone()]])
        })
        .build()
        .await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "auth_sub": unique_str("auth0|intruder") }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(
        resp,
        409,
        "AUTH_SUB_MISMATCH",
        "This email is already linked to a different sign-in identity. Please use the original identity or contact support.",
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn test_login_normalizes_email_case() -> Result<(), Box<dyn std::error::Error>> {
    let sub = unique_str("auth0|case");
    let email = unique_email("case").to_lowercase();
    let user = customer_row(44, &sub);
    let creds = credentials_row(64, user.id, &email);

    let state = test_state_builder()
        .with_mock_db_with_results(|mock| {
            mock.append_query_results([vec![creds.clone()]])
                .append_query_results([vec![user.clone()]])
                .append_query_results([vec![creds.clone()]])
        })
        .build()
        .await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    // Uppercased input should still hit the stored lowercase credentials.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email.to_uppercase(), "auth_sub": sub }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    Ok(())
}
