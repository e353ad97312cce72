//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// JSON extractor that automatically validates the payload.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(first_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// First field message, looking into nested structs and lists.
fn first_message(errors: &ValidationErrors) -> String {
    use validator::ValidationErrorsKind;

    for kind in errors.errors().values() {
        let found = match kind {
            ValidationErrorsKind::Field(errors) => errors
                .iter()
                .find_map(|error| error.message.as_ref().map(|msg| msg.to_string())),
            ValidationErrorsKind::Struct(nested) => Some(first_message(nested)),
            ValidationErrorsKind::List(items) => {
                items.values().next().map(|nested| first_message(nested))
            }
        };
        if let Some(message) = found {
            return message;
        }
    }

    "Validation failed".to_string()
}
