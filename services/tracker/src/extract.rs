//! Request body extraction

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Body decoded from JSON or from an urlencoded form, chosen by content type
///
/// Anything not declared as JSON is read as a form, which is what HTML forms
/// and most command-line clients send.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
                ApiError::MalformedBody {
                    status: rejection.status(),
                    message: rejection.body_text(),
                }
            })?;
            return Ok(Self(value));
        }

        let Form(value) = Form::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::MalformedBody {
                status: rejection.status(),
                message: rejection.body_text(),
            }
        })?;
        Ok(Self(value))
    }
}
