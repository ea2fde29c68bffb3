//! # Web API Errors
//!
//! Maps [`AutomationError`] onto HTTP responses. The body is always
//! `{ "error": <message>, "kind": <ErrorKind>, "Result": "Error message" }`,
//! where the message is the remote diagnostic body when one exists. Web
//! clients written against the original endpoints detect failure through the
//! constant `Result` marker; `kind` is for newer callers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::constants::ERROR_RESULT_MARKER;
use crate::error::{AutomationError, ErrorKind};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError(pub AutomationError);

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(rename = "Result")]
    pub result: &'static str,
}

impl From<AutomationError> for ApiError {
    fn from(error: AutomationError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::AuthFailure | ErrorKind::UpstreamError | ErrorKind::PartialFailure => {
                StatusCode::BAD_GATEWAY
            }
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self
                .0
                .upstream_body()
                .map(str::to_string)
                .unwrap_or_else(|| self.0.to_string()),
            kind: self.0.kind(),
            result: ERROR_RESULT_MARKER,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self.0, "Request failed");
        } else {
            warn!(status = %status, error = %self.0, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AutomationError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (AutomationError::auth_failure("x"), StatusCode::BAD_GATEWAY),
            (
                AutomationError::upstream("op", 500, "x"),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AutomationError::partial_failure("k", "x"),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AutomationError::Transport {
                    operation: "op".to_string(),
                    message: "x".to_string(),
                    timed_out: true,
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError(error).status_code(), expected);
        }
    }

    #[test]
    fn test_body_prefers_remote_diagnostic() {
        let body = ApiError(AutomationError::upstream(
            "get work item status",
            404,
            "{\"error\":\"no such item\"}",
        ))
        .body();
        assert_eq!(body.error, "{\"error\":\"no such item\"}");
        assert_eq!(body.kind, ErrorKind::UpstreamError);

        let body = ApiError(AutomationError::invalid_input("invalid activity name")).body();
        assert_eq!(body.error, "Invalid input: invalid activity name");
        assert_eq!(body.kind, ErrorKind::InvalidInput);
    }

    #[test]
    fn test_body_keeps_legacy_result_marker() {
        let body = ApiError(AutomationError::auth_failure("bad credentials")).body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["Result"], "Error message");
        assert_eq!(json["kind"], "AuthFailure");
        assert!(json["error"].as_str().unwrap().contains("bad credentials"));
    }
}
