//! Security event lines, kept grep-friendly via a fixed `event` field.

use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Failed login attempt. `reason` is a short machine token such as
/// `auth_sub_mismatch`; the email goes through redaction and may be
/// absent when the failure happened before parsing.
pub fn login_failed(reason: &str, email: Option<&str>) {
    warn!(
        event = "SECURITY_LOGIN_FAILED",
        trace_id = %trace_ctx::trace_id(),
        email = %Redacted(email.unwrap_or_default()),
        reason,
        "Authentication failure"
    );
}
