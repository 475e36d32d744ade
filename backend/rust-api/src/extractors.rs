use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::Validate;

/// JSON body extractor that also runs `validator` rules.
///
/// Both malformed bodies and failed validation come back as a JSON 400
/// instead of axum's plain-text rejection.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => value,
            Err(rejection) => {
                return Err(bad_request(format!(
                    "Failed to parse JSON request body: {}",
                    rejection
                )))
            }
        };

        value
            .validate()
            .map_err(|errors| bad_request(format!("Validation failed: {}", errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn bad_request(message: String) -> Response {
    tracing::warn!("{}", message);
    let error_response = json!({
        "message": message,
        "status": 400
    });
    (StatusCode::BAD_REQUEST, Json(error_response)).into_response()
}
