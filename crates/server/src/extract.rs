//! Extractors whose rejections render through [`ApiError`].

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;

use crate::errors::ApiError;

/// `axum::Json` with a 400 `{"error": ...}` on any decode failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` with a 400 `{"error": ...}` on a malformed segment.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct IdPath<T>(pub T);

/// Single `:id` segment that must be a positive integer.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let IdPath(id) = IdPath::<i32>::from_request_parts(parts, state).await?;
        if id <= 0 {
            return Err(ApiError::BadRequest(format!("invalid id {id}: must be a positive integer")));
        }
        Ok(Self(id))
    }
}
