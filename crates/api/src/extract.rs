//! JSON body extractor whose rejection uses the API error envelope.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] as a handler argument.
///
/// A missing content type, malformed JSON or a body of the wrong shape is
/// rejected as a 400 `BAD_REQUEST` with the usual `{error, code}` body
/// instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn create(AppJson(input): AppJson<CreateApplication>) -> AppResult<...> { ... }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}
