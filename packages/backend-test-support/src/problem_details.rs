//! Assertions for the problem+json error contract.
//!
//! Every error the backend emits must carry the same body shape and the
//! same header rules. Integration suites funnel their error responses
//! through [`assert_error_contract`] so a contract regression fails every
//! suite at once instead of only the one that happened to look.
//!
//! This crate deliberately has no dependency on the backend itself, so
//! the expected values (including the `type` URI prefix) are passed in
//! by the caller.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Deserialized problem+json body, independent of backend types.
#[derive(Debug, Deserialize)]
pub struct ProblemBody {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// What a single error response is expected to look like.
pub struct ExpectedProblem<'a> {
    pub status: u16,
    pub code: &'a str,
    pub detail: &'a str,
    /// Required prefix of the `type` URI, e.g. `https://larkstore.app/errors/`.
    pub type_prefix: &'a str,
}

/// Consume a service response and split it into the parts the contract
/// check needs. Panics if the body is not valid problem+json.
pub async fn read_problem(resp: ServiceResponse<BoxBody>) -> (StatusCode, HeaderMap, ProblemBody) {
    let status = resp.status();
    let headers = resp.headers().clone();
    let raw = actix_web::test::read_body(resp).await;
    let body: ProblemBody = serde_json::from_slice(&raw).unwrap_or_else(|e| {
        panic!(
            "error body is not problem+json ({e}): {}",
            String::from_utf8_lossy(&raw)
        )
    });
    (status, headers, body)
}

/// Check one error response against the full contract: status line, body
/// fields, trace id parity and the per-status header rules.
pub fn assert_error_contract(
    status: StatusCode,
    headers: &HeaderMap,
    body: &ProblemBody,
    expect: &ExpectedProblem<'_>,
) {
    assert_eq!(status.as_u16(), expect.status, "unexpected response status");
    assert_eq!(
        body.status, expect.status,
        "body status must mirror the status line"
    );
    assert_eq!(body.code, expect.code, "unexpected error code");
    assert_eq!(body.detail, expect.detail, "unexpected detail text");
    assert!(!body.title.is_empty(), "title must not be empty");
    assert!(
        body.type_uri.starts_with(expect.type_prefix),
        "type URI {} does not start with {}",
        body.type_uri,
        expect.type_prefix
    );

    let content_type = header_str(headers, "content-type");
    assert!(
        content_type.starts_with("application/problem+json"),
        "content-type must be application/problem+json, got {content_type}"
    );

    let trace_header = header_str(headers, "x-trace-id");
    assert!(
        !trace_header.is_empty(),
        "x-trace-id header missing or empty"
    );
    assert_eq!(
        body.trace_id, trace_header,
        "trace_id in body must equal the x-trace-id header"
    );

    assert_auth_header_rules(expect.status, headers);
}

/// Per-status header rules.
///
/// 401 carries a challenge and nothing else, 503 carries a retry hint and
/// nothing else, the plain client errors carry neither.
fn assert_auth_header_rules(status: u16, headers: &HeaderMap) {
    let www_authenticate = headers.get("www-authenticate");
    let retry_after = headers.get("retry-after");

    match status {
        401 => {
            let challenge = www_authenticate
                .and_then(|v| v.to_str().ok())
                .expect("401 must carry a WWW-Authenticate challenge");
            assert_eq!(challenge, "Bearer");
            assert!(retry_after.is_none(), "401 must not carry Retry-After");
        }
        503 => {
            let hint = retry_after
                .and_then(|v| v.to_str().ok())
                .expect("503 must carry a Retry-After hint");
            assert!(!hint.is_empty(), "Retry-After must not be empty");
            assert!(
                www_authenticate.is_none(),
                "503 must not carry WWW-Authenticate"
            );
        }
        400 | 403 | 404 | 409 => {
            assert!(
                www_authenticate.is_none(),
                "{status} must not carry WWW-Authenticate"
            );
            assert!(retry_after.is_none(), "{status} must not carry Retry-After");
        }
        _ => {}
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
