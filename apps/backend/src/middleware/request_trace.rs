//! Per-request trace id assignment.
//!
//! Registered last in the wrap chain, so it runs outermost: the id must
//! exist before `TraceSpan` opens its span and before anything logs.
//! Picks a trace id, stores it in the request extensions, runs the rest
//! of the request inside the task-local scope from [`crate::trace_ctx`],
//! and stamps the id onto the response under both `x-request-id` and
//! `x-trace-id` (the latter matches the `trace_id` field of problem
//! bodies).

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::HttpMessage;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::trace_ctx;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const TRACE_ID: HeaderName = HeaderName::from_static("x-trace-id");

/// Reuse the caller's `x-request-id` when it is a well-formed UUID,
/// otherwise mint a fresh one. The UUID requirement keeps arbitrary
/// caller strings out of logs and response headers.
fn select_trace_id(req: &ServiceRequest) -> String {
    req.headers()
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string()
}

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = select_trace_id(&req);
        req.extensions_mut().insert(trace_id.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            // Everything downstream, including error rendering, runs
            // inside the scope so it sees this request's id.
            let mut res = trace_ctx::with_trace_id(trace_id.clone(), fut).await?;

            // Always a valid header value: the id came from Uuid.
            if let Ok(value) = HeaderValue::from_str(&trace_id) {
                res.headers_mut().insert(REQUEST_ID, value.clone());
                res.headers_mut().insert(TRACE_ID, value);
            }

            Ok(res)
        })
    }
}
