#![allow(dead_code)]

//! Shared glue for the integration binaries.
//!
//! The heavy lifting lives in `backend_test_support::problem_details`;
//! this module pins the values that are specific to this backend (the
//! `type` URI prefix) and installs logging once per binary.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use backend_test_support::problem_details::{
    assert_error_contract, read_problem, ExpectedProblem,
};

/// `type` URI prefix every error body must carry.
pub const ERROR_TYPE_PREFIX: &str = "https://larkstore.app/errors/";

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Assert that `resp` is a problem+json error with the given status,
/// code and exact detail text, and that it honors the header rules
/// (trace id parity, content type, 401/503 side headers).
pub async fn assert_problem_details_structure(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
    expected_detail: &str,
) {
    let (status, headers, body) = read_problem(resp).await;
    assert_error_contract(
        status,
        &headers,
        &body,
        &ExpectedProblem {
            status: expected_status,
            code: expected_code,
            detail: expected_detail,
            type_prefix: ERROR_TYPE_PREFIX,
        },
    );
}
