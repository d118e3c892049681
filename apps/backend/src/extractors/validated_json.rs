use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Upper bound on accepted JSON bodies. Matches the actix default.
const MAX_BODY_BYTES: usize = 262_144;

/// JSON body extractor with sanitized error handling.
///
/// Deserialization failures become a 400 problem+json response with a
/// classified, PII-free detail instead of actix's raw serde message.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let payload = payload.take();

        // Capture the content type up front; the request cannot be
        // borrowed across an await.
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        Box::pin(async move {
            let body = read_body(payload).await?;

            match serde_json::from_slice::<T>(&body) {
                Ok(value) => Ok(ValidatedJson(value)),
                Err(e) => {
                    debug!(
                        trace_id = %trace_ctx::trace_id(),
                        error = %Redacted(&e.to_string()),
                        content_type = %content_type,
                        body_size = body.len(),
                        "JSON parsing failed"
                    );
                    Err(AppError::bad_request(
                        ErrorCode::BadRequest,
                        classify_json_error(&e),
                    ))
                }
            }
        })
    }
}

/// Drains the payload into memory, rejecting bodies over [`MAX_BODY_BYTES`].
async fn read_body(mut payload: Payload) -> Result<BytesMut, AppError> {
    let mut body = BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            warn!(
                trace_id = %trace_ctx::trace_id(),
                error = %e,
                "Failed to read request body chunk"
            );
            AppError::bad_request(
                ErrorCode::BadRequest,
                "Failed to read request body".to_string(),
            )
        })?;

        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(AppError::bad_request(
                ErrorCode::BadRequest,
                "Request body exceeds size limit".to_string(),
            ));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Maps a serde error onto a caller-safe detail that never echoes body
/// content back.
fn classify_json_error(error: &JsonError) -> String {
    use serde_json::error::Category;

    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        Category::Data => "Invalid JSON: wrong types for one or more fields".to_string(),
        Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}
