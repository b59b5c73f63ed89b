use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejections render through [`ApiError`], so malformed
/// bodies get the same JSON error shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
