//! Unique test data generation.
//!
//! Suites run in parallel and some of them share a database, so fixture
//! identities (auth subjects, customer emails) must never collide. A ULID
//! suffix keeps values unique per call and sortable by creation time,
//! which makes stale rows easy to spot when a test leaves them behind.

use ulid::Ulid;

/// All generated emails land on this reserved domain so a misconfigured
/// test can never mail a real address.
const EMAIL_DOMAIN: &str = "example.test";

/// `{prefix}-{ulid}`, unique per call.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("sub-admin");
/// let b = unique_str("sub-admin");
/// assert_ne!(a, b);
/// assert!(a.starts_with("sub-admin-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}

/// `{prefix}-{ulid}@example.test`, unique per call.
///
/// Note that ULIDs are upper-case; callers that feed this into code
/// paths which normalize emails should lowercase it first.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("customer");
/// assert!(email.starts_with("customer-"));
/// assert!(email.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@{EMAIL_DOMAIN}", Ulid::new())
}
