//! Error body returned by every failing endpoint.

use serde::{Deserialize, Serialize};

use crate::dto::PostResponse;

/// `{ "error": "<message>" }`, plus the conflicting post for duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostResponse>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            post: None,
        }
    }

    pub fn with_post(mut self, post: PostResponse) -> Self {
        self.post = Some(post);
        self
    }

    pub fn unknown_endpoint() -> Self {
        Self::new("unknown endpoint")
    }

    pub fn internal_error() -> Self {
        Self::new("internal server error")
    }
}
