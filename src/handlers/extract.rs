//! JSON body extractor that also runs `validator` rules

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::AppError;

/// Like `Json<T>`, but every rejection becomes a 422 naming the bad field(s)
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate().map_err(|e| AppError::Validation(describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    // body_text carries serde's message, which names the missing/mistyped field
    AppError::Validation(rejection.body_text())
}

fn describe(errors: &ValidationErrors) -> String {
    let mut details: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{}: invalid value", field),
            })
        })
        .collect();
    details.sort();

    let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
    fields.sort();

    format!("Invalid field(s) {}: {}", fields.join(", "), details.join("; "))
}
