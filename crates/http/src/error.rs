//! Error handling for the storefront HTTP layer

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::html;

/// Page-level errors rendered as an HTML error page
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    /// An upstream API failed; `message` is what the visitor sees.
    #[error("upstream failure: {message}")]
    Upstream { message: String, code: String },

    #[error("timed out: {message}")]
    Timeout { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    /// Create an upstream failure error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            code: "upstream_error".to_string(),
        }
    }

    /// Create a deadline-exceeded error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            code: "timeout".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::now_v7();
        let timestamp = OffsetDateTime::now_utc();
        let status = self.status();

        let (error_code, message) = match self {
            AppError::NotFound { message, code }
            | AppError::BadRequest { message, code }
            | AppError::Upstream { message, code }
            | AppError::Timeout { message, code } => (code, message),
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, error = ?e, "internal error");
                (
                    "internal_error".to_string(),
                    "Something went wrong. Please try again later.".to_string(),
                )
            }
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "request error"
            );
        }

        let body = html::layout(
            "Error",
            &format!(
                "<div class=\"status\">\n<p class=\"error\" data-code=\"{}\">{}</p>\n\
                 <p class=\"trace\">Reference {} at {}</p>\n</div>",
                html::escape(&error_code),
                html::escape(&message),
                error_id,
                timestamp
            ),
        );

        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::upstream("x").status(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::timeout("x").status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_constructor_codes() {
        match AppError::upstream("Failed to load products.") {
            AppError::Upstream { code, message } => {
                assert_eq!(code, "upstream_error");
                assert_eq!(message, "Failed to load products.");
            }
            _ => panic!("Expected Upstream error"),
        }
    }

    #[tokio::test]
    async fn test_error_page_shows_message() {
        let response = AppError::upstream("Failed to load products.").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Failed to load products."));
        assert!(body.contains("data-code=\"upstream_error\""));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::Internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("connection refused"));
    }
}
