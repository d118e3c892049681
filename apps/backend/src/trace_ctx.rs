//! Task-local trace id for the current request.
//!
//! `RequestTrace` opens a scope around each request future; anything
//! running inside it (error rendering, security log lines, extractor
//! logging) can read the id without it being threaded through every
//! signature. Outside a request scope the id degrades to a fixed
//! placeholder instead of failing.

use std::future::Future;

use tokio::task_local;

task_local! {
    static CURRENT: String;
}

/// Placeholder returned outside any request scope, e.g. from startup
/// code or detached tasks.
pub const NO_TRACE: &str = "unknown";

/// Trace id of the enclosing request, or [`NO_TRACE`].
pub fn trace_id() -> String {
    CURRENT
        .try_with(Clone::clone)
        .unwrap_or_else(|_| NO_TRACE.to_string())
}

/// Run `future` with `id` as the ambient trace id. Scopes nest; the
/// outer id is visible again once the inner future completes.
pub async fn with_trace_id<F, R>(id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    CURRENT.scope(id, future).await
}
