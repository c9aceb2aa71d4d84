use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every handler returns `Result<_, ApiError>` and short-circuits with
/// `?`, so each request produces exactly one response.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    /// 404 carries the same two-field `{message, error}` body as the
    /// 401 rejections; the clients read both fields.
    #[error("{message}")]
    NotFound { message: String, error: String },

    /// 401 with the two-field `{message, error}` body the clients expect
    /// from the login and account-ownership checks.
    #[error("{message}")]
    Rejected { message: String, error: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            error: error.into(),
        }
    }

    pub fn rejected(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            error: error.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "message": m })),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, json!({ "message": m })),
            ApiError::NotFound { message, error } => (
                StatusCode::NOT_FOUND,
                json!({ "message": message, "error": error }),
            ),
            ApiError::Rejected { message, error } => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": message, "error": error }),
            ),
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": err.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
