//! JSON request body extractor.
//!
//! Wraps axum's `Json` so a body that is missing, not JSON, or the wrong
//! shape is answered with the same `{"error","reason"}` envelope as every
//! other failure.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// Axum extractor for a typed JSON payload.
///
/// # Example
///
/// ```rust,ignore
/// use medgate_rest::extractors::JsonBody;
///
/// async fn create_handler(JsonBody(input): JsonBody<NewPatient>) {
///     println!("Admitting {:?}", input.name);
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                RestError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
            })?;
        Ok(JsonBody(value))
    }
}
