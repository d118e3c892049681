//! Support crate for the backend test suites.
//!
//! Three concerns live here because every integration binary needs them:
//! the logging bootstrap, the problem+json error contract checks, and
//! unique fixture data. Nothing in this crate may depend on the backend
//! crate itself, so the suites can assert the wire contract from the
//! outside.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
