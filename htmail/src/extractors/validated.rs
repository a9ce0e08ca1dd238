//! Validated JSON extractor
//!
//! Deserializes a JSON body and runs the `validator` rules on it. Failures are
//! reported as [`ApiError`] so they carry the usual `{"detail": ...}` body.
//!
//! # Example
//!
//! ```rust,no_run
//! use htmail::extractors::ValidatedJson;
//! use axum::Json;
//! use serde::Deserialize;
//! use validator::Validate;
//!
//! #[derive(Debug, Deserialize, Validate)]
//! struct Preview {
//!     #[validate(length(min = 1))]
//!     template_name: String,
//! }
//!
//! async fn preview(ValidatedJson(body): ValidatedJson<Preview>) -> Json<String> {
//!     Json(body.template_name)
//! }
//! ```

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has passed validation
///
/// - Body that is not JSON, or not well-formed: 400
/// - Well-formed JSON of the wrong shape, or failing validation: 422
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        data.validate()
            .map_err(|errors| ApiError::Unprocessable(format_validation_errors(&errors)))?;

        Ok(Self(data))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let message = rejection.body_text();
    match rejection.status() {
        StatusCode::UNPROCESSABLE_ENTITY => ApiError::Unprocessable(message),
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(message),
        _ => ApiError::BadRequest(message),
    }
}

/// Format validation errors as one line per failing rule
///
/// Uses the rule's message when it has one, `field: code` otherwise. Fields
/// are sorted so the output is stable.
#[must_use]
pub fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut messages = Vec::new();
    for (field, field_errors) in fields {
        for error in field_errors {
            let message = error.message.as_ref().map_or_else(
                || format!("{field}: {}", error.code),
                ToString::to_string,
            );
            messages.push(message);
        }
    }

    messages.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(length(min = 1, message = "name must not be empty"))]
        name: String,
        #[validate(range(min = 1))]
        count: u32,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let req = json_request(r#"{"name": "welcome", "count": 2}"#);
        let ValidatedJson(body) = ValidatedJson::<Signup>::from_request(req, &()).await.unwrap();
        assert_eq!(body.name, "welcome");
        assert_eq!(body.count, 2);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let req = json_request(r#"{"name": "#);
        let err = ValidatedJson::<Signup>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_unprocessable() {
        let req = json_request(r#"{"name": 5}"#);
        let err = ValidatedJson::<Signup>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_failed_validation_lists_rules() {
        let req = json_request(r#"{"name": "", "count": 0}"#);
        let err = ValidatedJson::<Signup>::from_request(req, &()).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "count: range\nname must not be empty");
    }
}
