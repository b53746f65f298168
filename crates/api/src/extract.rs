//! Request extractors whose rejections use the API's JSON error format.

use axum::extract::FromRequest;

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] that rejects malformed bodies with
/// a 400 `{ error, code }` response instead of axum's plain-text one.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
