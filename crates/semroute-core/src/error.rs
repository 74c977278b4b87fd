//! Error types for semroute

use crate::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;
use std::fmt;

/// Errors raised while registering a versioned route.
///
/// Every variant is a configuration mistake. They surface once, from
/// [`build`](crate::Versioned::build), and never during request handling.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `fallback_latest` and `default_version` were both set for the same
    /// route, after layering per-route options over the process defaults.
    #[error("`fallback_latest` and `default_version` are mutually exclusive")]
    FallbackConflict,

    /// A configured header name is not a legal HTTP header name.
    #[error("invalid header name `{name}`")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },

    /// A key in the handler table was not a valid semantic version.
    #[error(transparent)]
    InvalidVersion(#[from] semver::Error),
}

/// Request-terminating error rendered as a plain-text response.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body text, sent verbatim
    pub message: String,
}

impl ApiError {
    /// Create a new error with an explicit status
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        http::Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(self.message)))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_renders_message_verbatim() {
        let response = ApiError::bad_request("Version ^3.0 is not supported").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn config_error_propagates_version_parse_failure() {
        let err = semver::Version::parse("not-a-version").unwrap_err();
        let wrapped = ConfigError::from(err);
        assert!(matches!(wrapped, ConfigError::InvalidVersion(_)));
    }
}
