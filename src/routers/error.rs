//! JSON error responses shared by the chat routes.
//!
//! Client-facing messages are fixed strings; failure detail goes to the
//! operational log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use provider_protocol::relaying::ErrorBody;

pub const NO_CONTENT_MESSAGE: &str = "A message, image, or attachment is required.";
pub const TOO_MANY_IMAGES_MESSAGE: &str = "At most 3 images can be uploaded per request.";
pub const PROCESSING_FAILED_MESSAGE: &str = "An error occurred while processing the message.";

pub fn bad_request(message: impl Into<String>) -> Response {
    create_error(StatusCode::BAD_REQUEST, message)
}

pub fn internal_error() -> Response {
    create_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        PROCESSING_FAILED_MESSAGE,
    )
}

pub fn create_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_carries_the_message() {
        let response = bad_request(NO_CONTENT_MESSAGE);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_error_uses_the_fixed_message() {
        let response = internal_error();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
