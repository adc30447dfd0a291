//! Mapping of rejections to `{error, message}` bodies
//!
//! | Cause | Status |
//! |-------|--------|
//! | malformed body, failed validation | 400 |
//! | unknown route, unknown task | 404 |
//! | wrong method | 405 |
//! | body over the limit | 413 |
//! | persistence failure | 500 |

use std::convert::Infallible;
use tasksync_model::api::ErrorBody;
use tasksync_store::StoreError;
use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Rejection, Reply};

/// A [`StoreError`] carried through warp's rejection path
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl Reject for ApiError {}

impl ApiError {
    /// HTTP status for the wrapped error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(crate) fn store_rejection(err: StoreError) -> Rejection {
    warp::reject::custom(ApiError(err))
}

fn classify(err: &Rejection) -> (StatusCode, &'static str, String) {
    if err.is_not_found() {
        return (StatusCode::NOT_FOUND, "NotFound", "no such route".to_string());
    }

    if let Some(api) = err.find::<ApiError>() {
        return (api.status(), api.0.kind(), api.0.to_string());
    }

    if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        return (StatusCode::BAD_REQUEST, "ValidationError", e.to_string());
    }
    if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        return (StatusCode::BAD_REQUEST, "ValidationError", e.to_string());
    }
    if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        return (StatusCode::BAD_REQUEST, "ValidationError", e.to_string());
    }
    if let Some(e) = err.find::<warp::reject::PayloadTooLarge>() {
        return (StatusCode::PAYLOAD_TOO_LARGE, "PayloadTooLarge", e.to_string());
    }
    if let Some(e) = err.find::<warp::reject::LengthRequired>() {
        return (StatusCode::LENGTH_REQUIRED, "LengthRequired", e.to_string());
    }
    if let Some(e) = err.find::<warp::reject::MethodNotAllowed>() {
        return (StatusCode::METHOD_NOT_ALLOWED, "MethodNotAllowed", e.to_string());
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "InternalError",
        format!("unhandled rejection: {err:?}"),
    )
}

/// Turn any rejection into a JSON error reply
///
/// # Errors
/// Never; the `Result` is what `Filter::recover` expects.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, error, message) = classify(&err);

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error, %message, "request failed");
    } else {
        tracing::debug!(status = status.as_u16(), error, %message, "request rejected");
    }

    let body = ErrorBody {
        error: error.to_string(),
        message,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
