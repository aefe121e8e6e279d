/// Error handling and the response envelope
///
/// Every domain error kind maps 1:1 to an HTTP status and a result code via
/// a fixed table. Handlers return `ApiResult<T>`; errors convert centrally
/// into the `{code, message, data}` envelope that wraps every response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use agora_shared::auth::{jwt::JwtError, password::PasswordError};
use agora_shared::redis::RedisClientError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Result code and message for successful responses
pub const SUCCESS_CODE: &str = "SUCCESS";
pub const SUCCESS_MESSAGE: &str = "Request processed successfully.";

/// Uniform response envelope
///
/// Success and failure responses share the same shape; `code` and `message`
/// come from the result-code table, `data` carries the payload (null on
/// errors).
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Wraps a payload in a success envelope
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
        }
    }
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Unified API error type
///
/// One variant per entry in the result-code table, plus infrastructure
/// variants that render as opaque 500s.
#[derive(Debug)]
pub enum ApiError {
    /// Access token missing a valid signature, expired, or blacklisted (401)
    InvalidAccessToken,

    /// Refresh token absent or not recognized (401)
    InvalidRefreshToken,

    /// No access token presented on a guarded endpoint (401)
    LoginRequired,

    /// Authenticated but not allowed to act on this resource (403)
    AccessDeny,

    /// Wrong password at login or password change (400)
    NotMatchedPassword,

    /// User lookup failed (404)
    NotFoundUser,

    /// Board lookup failed (404)
    NotFoundBoard,

    /// Comment lookup failed (404)
    NotFoundComment,

    /// Username already taken at signup (409)
    DuplicatedUsername,

    /// Nickname already taken at signup or profile update (409)
    DuplicatedNickname,

    /// Password and confirmation differ (409)
    DifferentPassword,

    /// Request body failed validation (400)
    Validation(Vec<ValidationErrorDetail>),

    /// Database failure (500)
    Database(String),

    /// Session cache failure (500)
    Cache(String),

    /// Anything else unexpected (500)
    Internal(String),
}

impl ApiError {
    /// Result-code table: status, code, and client-facing message
    fn table_entry(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            ApiError::InvalidAccessToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_ACCESS_TOKEN",
                "The access token is not valid.",
            ),
            ApiError::InvalidRefreshToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_REFRESH_TOKEN",
                "The refresh token is not valid.",
            ),
            ApiError::LoginRequired => (
                StatusCode::UNAUTHORIZED,
                "LOGIN_REQUIRED",
                "Please log in again.",
            ),
            ApiError::AccessDeny => {
                (StatusCode::FORBIDDEN, "ACCESS_DENY", "Access is denied.")
            }
            ApiError::NotMatchedPassword => (
                StatusCode::BAD_REQUEST,
                "NOT_MATCHED_PASSWORD",
                "The password does not match.",
            ),
            ApiError::NotFoundUser => {
                (StatusCode::NOT_FOUND, "NOT_FOUND_USER", "User not found.")
            }
            ApiError::NotFoundBoard => {
                (StatusCode::NOT_FOUND, "NOT_FOUND_BOARD", "Board not found.")
            }
            ApiError::NotFoundComment => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND_COMMENT",
                "Comment not found.",
            ),
            ApiError::DuplicatedUsername => (
                StatusCode::CONFLICT,
                "DUPLICATED_USERNAME",
                "The username is already taken.",
            ),
            ApiError::DuplicatedNickname => (
                StatusCode::CONFLICT,
                "DUPLICATED_NICKNAME",
                "The nickname is already taken.",
            ),
            ApiError::DifferentPassword => (
                StatusCode::CONFLICT,
                "DIFFERENT_PASSWORD",
                "The password confirmation does not match.",
            ),
            ApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Request validation failed.",
            ),
            ApiError::Database(_) | ApiError::Cache(_) | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred.",
            ),
        }
    }

    /// HTTP status for this error kind
    pub fn status(&self) -> StatusCode {
        self.table_entry().0
    }

    /// Result code for this error kind
    pub fn code(&self) -> &'static str {
        self.table_entry().1
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Database(msg) => write!(f, "Database error: {}", msg),
            ApiError::Cache(msg) => write!(f, "Cache error: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            other => write!(f, "{}", other.table_entry().2),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log internals server-side but never expose details to clients
        match &self {
            ApiError::Database(msg) => tracing::error!("Database error: {}", msg),
            ApiError::Cache(msg) => tracing::error!("Cache error: {}", msg),
            ApiError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }

        let (status, code, message) = self.table_entry();

        // Validation errors carry their field details in the data slot
        let data = match self {
            ApiError::Validation(details) => {
                Some(serde_json::to_value(details).unwrap_or_default())
            }
            _ => None,
        };

        let body = Json(Envelope {
            code: code.to_string(),
            message: message.to_string(),
            data,
        });

        (status, body).into_response()
    }
}

/// Database errors: unique-constraint violations surface as the matching
/// duplication error (storage-level backstop for the application checks)
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("username") {
                    return ApiError::DuplicatedUsername;
                }
                if constraint.contains("nickname") {
                    return ApiError::DuplicatedNickname;
                }
            }
        }

        ApiError::Database(err.to_string())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::MissingToken => ApiError::LoginRequired,
            JwtError::CreateError(msg) => ApiError::Internal(msg),
            JwtError::Expired | JwtError::Malformed(_) | JwtError::Invalid(_) => {
                ApiError::InvalidAccessToken
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<RedisClientError> for ApiError {
    fn from(err: RedisClientError) -> Self {
        ApiError::Cache(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidAccessToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidRefreshToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::LoginRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::AccessDeny.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFoundUser.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotFoundBoard.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotFoundComment.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::DuplicatedUsername.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::DuplicatedNickname.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::DifferentPassword.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotMatchedPassword.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_share_one_code() {
        assert_eq!(ApiError::Database("x".into()).code(), "INTERNAL_ERROR");
        assert_eq!(ApiError::Cache("x".into()).code(), "INTERNAL_ERROR");
        assert_eq!(ApiError::Internal("x".into()).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::success(serde_json::json!({"available": true}));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["code"], "SUCCESS");
        assert_eq!(json["message"], SUCCESS_MESSAGE);
        assert_eq!(json["data"]["available"], true);
    }

    #[test]
    fn test_missing_token_becomes_login_required() {
        let err: ApiError = JwtError::MissingToken.into();
        assert_eq!(err.code(), "LOGIN_REQUIRED");

        let err: ApiError = JwtError::Expired.into();
        assert_eq!(err.code(), "INVALID_ACCESS_TOKEN");
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFoundUser;
        assert_eq!(err.to_string(), "User not found.");

        let err = ApiError::Validation(vec![]);
        assert_eq!(err.to_string(), "Validation failed: 0 errors");
    }
}
