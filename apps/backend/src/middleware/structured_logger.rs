//! Request completion logging.
//!
//! One line per finished request, leveled by outcome: server errors at
//! error, client errors at warn, the rest at info. Works on the error
//! path too, where downstream middleware short-circuited with an `Err`
//! and no response exists yet.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::trace_ctx;

/// Paths polled by infrastructure; successful hits are not logged.
const QUIET_PATHS: &[&str] = &["/health"];

struct RequestLine {
    method: String,
    path: String,
    trace_id: String,
    started: Instant,
}

impl RequestLine {
    fn emit(&self, status: StatusCode) {
        let elapsed_us = self.started.elapsed().as_micros() as u64;
        let status = status.as_u16();

        if status >= 500 {
            error!(
                method = %self.method,
                path = %self.path,
                status,
                elapsed_us,
                trace_id = %self.trace_id,
                "request finished"
            );
        } else if status >= 400 {
            warn!(
                method = %self.method,
                path = %self.path,
                status,
                elapsed_us,
                trace_id = %self.trace_id,
                "request finished"
            );
        } else if !QUIET_PATHS.contains(&self.path.as_str()) {
            info!(
                method = %self.method,
                path = %self.path,
                status,
                elapsed_us,
                trace_id = %self.trace_id,
                "request finished"
            );
        }
    }
}

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let line = RequestLine {
            method: req.method().to_string(),
            path: req.path().to_string(),
            trace_id: req
                .extensions()
                .get::<String>()
                .cloned()
                .unwrap_or_else(|| trace_ctx::NO_TRACE.to_string()),
            started: Instant::now(),
        };

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            line.emit(status);

            result
        })
    }
}
