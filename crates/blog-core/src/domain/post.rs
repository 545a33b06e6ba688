use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TEXT_MAX_LEN, TEXT_MIN_LEN};
use crate::error::DomainError;

/// Post entity - a blog entry owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Owning user. Set at creation and never changed.
    pub user_id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    /// Users that liked this post through the like pathway.
    pub liked_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `user_id`.
    pub fn new(user_id: Uuid, new_post: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: new_post.title,
            author: new_post.author,
            url: new_post.url,
            likes: new_post.likes.unwrap_or(0),
            liked_by: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.liked_by.contains(&user_id)
    }

    /// Copy the present patch fields onto the post. `liked_by` is untouched.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(likes) = patch.likes {
            self.likes = likes;
        }
        self.updated_at = Utc::now();
    }

    /// Record a like from `user_id`, trusting the requested count.
    pub fn record_like(&mut self, user_id: Uuid, likes: i64) {
        self.liked_by.push(user_id);
        self.likes = likes;
        self.updated_at = Utc::now();
    }
}

/// Fields accepted when creating a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: Option<i64>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_text("Title", &self.title)?;
        validate_text("Author", &self.author)?;
        validate_text("Url", &self.url)?;
        validate_likes(self.likes)
    }
}

/// Partial update of a post. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl PostPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validate_text("Title", title)?;
        }
        if let Some(author) = &self.author {
            validate_text("Author", author)?;
        }
        if let Some(url) = &self.url {
            validate_text("Url", url)?;
        }
        validate_likes(self.likes)
    }
}

/// Public view of a post owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// A post together with its resolved owner.
///
/// `owner` is `None` only when the owning user record has disappeared.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetails {
    pub post: Post,
    pub owner: Option<Owner>,
}

fn validate_text(label: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{label} required")));
    }
    let len = value.chars().count();
    if len < TEXT_MIN_LEN {
        return Err(DomainError::Validation(format!("{label} too short")));
    }
    if len > TEXT_MAX_LEN {
        return Err(DomainError::Validation(format!("{label} too long")));
    }
    Ok(())
}

fn validate_likes(likes: Option<i64>) -> Result<(), DomainError> {
    match likes {
        Some(n) if n < 0 => Err(DomainError::Validation(
            "Likes cannot be negative".to_string(),
        )),
        _ => Ok(()),
    }
}
