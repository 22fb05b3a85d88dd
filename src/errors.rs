use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::services::otp_service::OtpError;
use crate::utils::jwt::TokenError;

/// Erreurs exposées par les handlers HTTP
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Une violation d'unicité signalée par la base devient un conflit
    pub fn from_db_conflict(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.to_string()),
            _ => AppError::Database(err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(_) => AppError::Unauthorized("Invalid or expired token".to_string()),
            TokenError::BadPayload => AppError::Validation(err.to_string()),
            TokenError::MissingUserId | TokenError::Signing(_) | TokenError::ExpiryOutOfRange => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::NotFound(_) => AppError::NotFound(err.to_string()),
            OtpError::Expired | OtpError::Mismatch | OtpError::AlreadyUsed => {
                AppError::Unauthorized(err.to_string())
            }
            OtpError::Database(e) => AppError::Database(e),
            OtpError::Delivery(_) => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Database(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_otp_error_mapping() {
        assert_eq!(
            AppError::from(OtpError::NotFound("A1".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::from(OtpError::Expired).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(OtpError::Mismatch).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(OtpError::AlreadyUsed).status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_token_error_mapping() {
        assert_eq!(AppError::from(TokenError::BadPayload).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(TokenError::MissingUserId).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(TokenError::ExpiryOutOfRange).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_internal_details_not_leaked() {
        let err = AppError::Database(DbErr::Custom("password authentication failed for user postgres".into()));
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("Internal server error."));
        assert!(!text.contains("postgres"));
    }
}
