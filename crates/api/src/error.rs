use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskboard_core::error::CoreError;
use taskboard_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store failure, tagged with the operation that hit it.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn store(context: &'static str, source: StoreError) -> Self {
        AppError::Store { context, source }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    tracing::warn!(entity, id = %id, "Entity not found");
                    error_body(
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("{entity} with id {id} not found"),
                    )
                }
                CoreError::Validation(msg) => {
                    tracing::warn!(error = %msg, "Validation failed");
                    error_body(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Store errors ---
            AppError::Store { context, source } => {
                tracing::error!(error = %source, "{context}");
                let body = json!({
                    "error": context,
                    "code": "STORE_ERROR",
                    "message": source.to_string(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body))
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                error_body(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
        };

        body.into_response()
    }
}

fn error_body(
    status: StatusCode,
    code: &'static str,
    message: String,
) -> (StatusCode, axum::Json<serde_json::Value>) {
    (
        status,
        axum::Json(json!({
            "error": message,
            "code": code,
        })),
    )
}

/// Last-resort response for a handler that panicked.
///
/// Used with `CatchPanicLayer::custom` so every request still gets a JSON
/// body of the form `{ error, code, message }`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!(panic = %message, "Request handler panicked");

    let body = json!({
        "error": "Internal server error",
        "code": "INTERNAL_ERROR",
        "message": message,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}

/// Give bodiless error responses the `{ error, code }` shape.
///
/// Covers responses no handler wrote: axum's 405, the timeout layer's 408
/// and the static file service's 404. Responses that already carry a
/// `Content-Type` pass through untouched, as do non-error statuses.
pub async fn bodiless_error_to_json(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(CONTENT_TYPE)
    {
        return response;
    }

    let code = match status {
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::REQUEST_TIMEOUT => "REQUEST_TIMEOUT",
        _ => "HTTP_ERROR",
    };
    let message = status.canonical_reason().unwrap_or("Request failed").to_string();

    // Keep headers such as `Allow`; swap the body.
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    let (json_parts, json_body) = error_body(status, code, message).into_response().into_parts();
    parts.headers.extend(json_parts.headers);
    Response::from_parts(parts, json_body)
}
