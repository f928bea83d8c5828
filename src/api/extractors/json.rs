//! JSON body extractor whose rejection uses the app's error body.
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Like `axum::Json`, but malformed bodies become `AppError::InvalidBody` (400)
/// instead of axum's plain-text rejection. Over-limit bodies stay 413.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::body_rejected(rejection.status(), rejection.body_text())
        })?;

        Ok(Self(value))
    }
}
