//! Extractors whose rejections use the same JSON error body as handlers.

use axum::{
    async_trait,
    body::{Body, to_bytes},
    extract::{FromRequest, FromRequestParts, Request},
};
use chairbook_core::errors::BookingError;
use serde::de::DeserializeOwned;

use crate::middleware::error_handling::AppError;

/// Largest body [`OptionalJson`] buffers, matching axum's default limit.
const OPTIONAL_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// A JSON body that may be left out entirely.
///
/// A zero-length body yields `None`. Anything else goes through [`AppJson`],
/// so a wrong content type or a body that does not match `T` is still a 400.
pub struct OptionalJson<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, OPTIONAL_BODY_LIMIT).await.map_err(|err| {
            AppError(BookingError::InvalidInput(format!(
                "Failed to read request body: {err}"
            )))
        })?;
        if bytes.is_empty() {
            return Ok(Self(None));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let AppJson(value) = AppJson::<T>::from_request(req, state).await?;
        Ok(Self(Some(value)))
    }
}
