//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::PostDetails;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    /// A post with the same title and author already exists.
    #[error("Post {} By: {} already exists", .0.post.title, .0.post.author)]
    DuplicatePost(Box<PostDetails>),

    #[error("{0}")]
    Forbidden(String),

    #[error("You have already liked this post")]
    AlreadyLiked,

    #[error("invalid username or password")]
    InvalidCredentials,

    /// The token was valid but the user it names no longer exists.
    #[error("userId missing or not valid")]
    UnknownCaller,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}
