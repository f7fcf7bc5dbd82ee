use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dormant_derive::api_model;
use std::borrow::Cow;

/// JSON body of every non-2xx API response.
#[api_model]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: String,
}

/// An HTTP-facing failure: a status code and a message safe to show callers.
///
/// Slices convert their own errors into this type; nothing else decides statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: Cow<'static, str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message.into_owned() })).into_response()
    }
}
