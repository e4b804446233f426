use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

pub const MALFORMED_REQUEST: &str = "Malformed Request.";
pub const METHOD_NOT_SUPPORTED: &str = "Method is not supported.";
pub const NOT_FOUND: &str = "404 not found.";

/// Request-level failure. Rendered as a plain-text body with a trailing
/// newline, the way `net/http`-style services answer errors.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn malformed_request() -> Self {
        Self::bad_request(MALFORMED_REQUEST)
    }

    /// Wrong method on a known route. Answered with `404`, not `405`.
    pub fn method_not_supported() -> Self {
        Self::not_found(METHOD_NOT_SUPPORTED)
    }

    pub fn unknown_route() -> Self {
        Self::not_found(NOT_FOUND)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, format!("{}\n", self.message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn renders_plain_text_body() {
        let response = AppError::malformed_request().into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Malformed Request.\n");
    }

    #[test]
    fn wrong_method_is_not_found() {
        assert_eq!(
            AppError::method_not_supported().status,
            StatusCode::NOT_FOUND
        );
    }
}
