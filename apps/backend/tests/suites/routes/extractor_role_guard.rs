use actix_web::{test, web, HttpResponse};
use backend::error::AppError;
use backend::extractors::{AdminUser, CurrentUser};
use backend::middleware::bearer_auth::BearerAuth;
use backend_test_support::unique_helpers::unique_str;
use serde_json::Value;

use crate::common::assert_problem_details_structure;
use crate::support::app_builder::create_test_app;
use crate::support::auth::bearer_header;
use crate::support::factory::{admin_row, customer_row, user_row};
use crate::support::state_builder_ext::StateBuilderTestExt;
use crate::support::{test_security_config, test_state_builder};

async fn admin_probe(admin: AdminUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": admin.user.id })))
}

/// Takes both the plain identity and the admin guard, so the request
/// runs two extractions over one loaded identity.
async fn double_extract(
    user: CurrentUser,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": user.id,
        "guard_id": admin.user.id,
    })))
}

fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/test-admin")
            .wrap(BearerAuth)
            .route("/probe", web::get().to(admin_probe))
            .route("/double", web::get().to(double_extract)),
    );
}

async fn probe_as(
    user: backend::entities::users::Model,
    uri: &str,
) -> Result<actix_web::dev::ServiceResponse, Box<dyn std::error::Error>> {
    let sub = user.sub.clone();
    let state = test_state_builder()
        .with_mock_db_with_results(|mock| mock.append_query_results([vec![user]]))
        .build()
        .await?;
    let app = create_test_app(state).with_routes(admin_routes).build().await?;

    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header((
            "Authorization",
            bearer_header(&sub, &test_security_config()),
        ))
        .to_request();

    Ok(test::call_service(&app, req).await)
}

#[actix_web::test]
async fn test_customer_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let user = customer_row(11, &unique_str("sub-customer"));
    let resp = probe_as(user, "/test-admin/probe").await?;

    assert_problem_details_structure(
        resp,
        403,
        "INSUFFICIENT_ROLE",
        "Insufficient role for this resource",
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn test_admin_passes() -> Result<(), Box<dyn std::error::Error>> {
    let user = admin_row(12, &unique_str("sub-admin"));
    let resp = probe_as(user, "/test-admin/probe").await?;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 12);

    Ok(())
}

#[actix_web::test]
async fn test_mixed_roles_pass() -> Result<(), Box<dyn std::error::Error>> {
    // Holding any allowed role is enough; extra roles do not hurt.
    let user = user_row(13, &unique_str("sub-mixed"), &["customer", "admin"]);
    let resp = probe_as(user, "/test-admin/probe").await?;

    assert_eq!(resp.status().as_u16(), 200);

    Ok(())
}

#[actix_web::test]
async fn test_unknown_roles_only_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    // Unknown stored names are dropped on load, leaving no usable role.
    let user = user_row(14, &unique_str("sub-unknown"), &["superuser"]);
    let resp = probe_as(user, "/test-admin/probe").await?;

    assert_problem_details_structure(
        resp,
        403,
        "INSUFFICIENT_ROLE",
        "Insufficient role for this resource",
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn test_identity_is_loaded_once_per_request() -> Result<(), Box<dyn std::error::Error>> {
    // The mock holds exactly one user row. A second lookup would hit an
    // empty result buffer and fail the request, so a 200 here proves
    // the guard reused the memoized identity.
    let user = admin_row(15, &unique_str("sub-memo"));
    let resp = probe_as(user, "/test-admin/double").await?;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 15);
    assert_eq!(body["guard_id"], 15);

    Ok(())
}
