//! Error types for the proxy.
//!
//! Every failure a handler can hit is a [`ProxyError`]; at the handler boundary
//! it is rendered as exactly one OpenAI-style error envelope.

use crate::translate::openai_types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub const INVALID_REQUEST_ERROR: &str = "invalid_request_error";
pub const SERVER_ERROR: &str = "server_error";
pub const TIMEOUT_ERROR: &str = "timeout_error";
pub const UPSTREAM_API_ERROR: &str = "nvidia_api_error";

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{env_var} not configured in environment variables")]
    MissingApiKey { env_var: String },

    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Request timeout - NVIDIA API took too long to respond")]
    Timeout,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Translation error: {message}")]
    Translation { message: String },

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl ProxyError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: msg.into(),
        }
    }

    pub fn upstream(status: u16, msg: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn translation(msg: impl Into<String>) -> Self {
        Self::Translation {
            message: msg.into(),
        }
    }

    /// HTTP status the client sees for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `type` tag of the error envelope.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed | Self::InvalidRequest { .. } => INVALID_REQUEST_ERROR,
            Self::Timeout => TIMEOUT_ERROR,
            Self::Upstream { .. } => UPSTREAM_API_ERROR,
            _ => SERVER_ERROR,
        }
    }

    /// The optional numeric `code` of the error envelope.
    ///
    /// Request validation failures carry no code; everything raised after the
    /// upstream call started echoes the status.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::MethodNotAllowed | Self::MissingApiKey { .. } | Self::InvalidRequest { .. } => {
                None
            }
            _ => Some(self.status().as_u16()),
        }
    }

    pub fn to_envelope(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_type(), self.to_string(), self.code())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_envelope())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_have_no_code() {
        let err = ProxyError::MethodNotAllowed;
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.error_type(), "invalid_request_error");
        assert_eq!(err.code(), None);

        let err = ProxyError::MissingApiKey {
            env_var: "NIM_API_KEY".to_string(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "server_error");
        assert_eq!(
            err.to_string(),
            "NIM_API_KEY not configured in environment variables"
        );
        assert_eq!(err.code(), None);

        let err = ProxyError::invalid_request("Missing required fields: model and messages");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "invalid_request_error");
    }

    #[test]
    fn test_upstream_errors_keep_status_and_message() {
        let err = ProxyError::upstream(429, "Too many requests");
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.error_type(), "nvidia_api_error");
        assert_eq!(err.code(), Some(429));
        assert_eq!(err.to_string(), "Too many requests");
    }

    #[test]
    fn test_timeout_and_generic_errors() {
        assert_eq!(ProxyError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ProxyError::Timeout.error_type(), "timeout_error");
        assert_eq!(ProxyError::Timeout.code(), Some(504));

        let err = ProxyError::translation("bad body");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "server_error");
        assert_eq!(err.code(), Some(500));
    }

    #[test]
    fn test_envelope_omits_missing_code() {
        let json = serde_json::to_value(ProxyError::MethodNotAllowed.to_envelope()).unwrap();
        assert_eq!(json["error"]["message"], "Method not allowed");
        assert_eq!(json["error"]["type"], "invalid_request_error");
        assert!(json["error"].get("code").is_none());

        let json = serde_json::to_value(ProxyError::Timeout.to_envelope()).unwrap();
        assert_eq!(json["error"]["code"], 504);
    }
}
