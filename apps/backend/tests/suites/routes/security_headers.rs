// Tests for security headers middleware
//
// Verifies the static header set on every response plus the path split:
// API paths and /health get a locked-down CSP and Cache-Control: no-store,
// everything else keeps the permissive CSP and stays cacheable.

use actix_web::dev::ServiceResponse;
use actix_web::{test, web, App, HttpResponse, Result};
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::security_headers::SecurityHeaders;
use backend::middleware::structured_logger::StructuredLogger;
use backend::middleware::trace_span::TraceSpan;

async fn test_handler() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

async fn call(path: &str) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(SecurityHeaders)
            .route("/api/test", web::get().to(test_handler))
            .route("/health", web::get().to(test_handler))
            .route("/", web::get().to(test_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri(path).to_request();
    test::call_service(&app, req).await
}

fn header<'a>(resp: &'a ServiceResponse, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

#[actix_web::test]
async fn test_static_headers_on_api_response() {
    let resp = call("/api/test").await;
    assert_eq!(resp.status().as_u16(), 200);

    assert_eq!(header(&resp, "x-content-type-options"), Some("nosniff"));
    assert_eq!(header(&resp, "x-frame-options"), Some("DENY"));
    assert_eq!(
        header(&resp, "strict-transport-security"),
        Some("max-age=31536000; includeSubDomains")
    );
    assert_eq!(
        header(&resp, "referrer-policy"),
        Some("strict-origin-when-cross-origin")
    );
    assert_eq!(
        header(&resp, "permissions-policy"),
        Some("geolocation=(), microphone=(), camera=(), payment=(), usb=(), magnetometer=(), gyroscope=(), accelerometer=()")
    );
    assert_eq!(header(&resp, "x-xss-protection"), Some("1; mode=block"));
}

#[actix_web::test]
async fn test_api_path_gets_locked_csp_and_no_store() {
    let resp = call("/api/test").await;

    assert_eq!(
        header(&resp, "content-security-policy"),
        Some("default-src 'none'; frame-ancestors 'none'")
    );
    assert_eq!(header(&resp, "cache-control"), Some("no-store"));
}

#[actix_web::test]
async fn test_health_path_gets_no_store() {
    let resp = call("/health").await;

    assert_eq!(
        header(&resp, "content-security-policy"),
        Some("default-src 'none'; frame-ancestors 'none'")
    );
    assert_eq!(header(&resp, "cache-control"), Some("no-store"));
}

#[actix_web::test]
async fn test_root_path_keeps_permissive_csp() {
    let resp = call("/").await;
    assert_eq!(resp.status().as_u16(), 200);

    let csp = header(&resp, "content-security-policy").unwrap_or_default();
    assert!(
        csp.starts_with("default-src 'self'"),
        "Root CSP should be the permissive variant, got: {csp}"
    );
    assert!(csp.contains("frame-ancestors 'none'"));
    assert!(
        header(&resp, "cache-control").is_none(),
        "Non-API responses stay cacheable"
    );
}

#[actix_web::test]
async fn test_headers_applied_to_unmatched_routes() {
    // The default 404 still flows through the middleware.
    let resp = call("/nope").await;
    assert_eq!(resp.status().as_u16(), 404);

    assert_eq!(header(&resp, "x-content-type-options"), Some("nosniff"));
    assert_eq!(header(&resp, "x-frame-options"), Some("DENY"));
}
