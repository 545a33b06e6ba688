//! Error translation - every failure becomes `{ "error": "<message>" }`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::DomainError;
use blog_core::ports::AuthError;
use blog_shared::ErrorResponse;
use blog_shared::dto::PostResponse;
use std::fmt;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// A post with the same title and author exists; it is returned alongside.
    DuplicatePost {
        message: String,
        post: Box<PostResponse>,
    },
    Unauthorized(String),
    Forbidden(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => write!(f, "{}", msg),
            AppError::DuplicatePost { message, .. } => write!(f, "{}", message),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::DuplicatePost { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::DuplicatePost { message, post } => {
                ErrorResponse::new(message.clone()).with_post(post.as_ref().clone())
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            other => ErrorResponse::new(other.to_string()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(message),
            DomainError::Validation(_)
            | DomainError::Duplicate(_)
            | DomainError::AlreadyLiked
            | DomainError::UnknownCaller => AppError::BadRequest(message),
            DomainError::DuplicatePost(details) => AppError::DuplicatePost {
                message,
                post: Box::new(PostResponse::from(*details)),
            },
            DomainError::Forbidden(_) => AppError::Forbidden(message),
            DomainError::InvalidCredentials => AppError::Unauthorized(message),
            DomainError::Internal(detail) => AppError::Internal(detail),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired | AuthError::MissingAuth => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::InvalidToken(ref detail) => {
                tracing::debug!("Rejected token: {}", detail);
                AppError::Unauthorized(err.to_string())
            }
            AuthError::HashingError(detail) => AppError::Internal(detail),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::post_not_found(Uuid::new_v4()), StatusCode::NOT_FOUND),
            (DomainError::AlreadyLiked, StatusCode::BAD_REQUEST),
            (
                DomainError::Forbidden("only the creator can delete".into()),
                StatusCode::FORBIDDEN,
            ),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::UnknownCaller, StatusCode::BAD_REQUEST),
            (DomainError::Internal("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_expired_token_message() {
        let err = AppError::from(AuthError::TokenExpired);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "token expired");
    }
}
