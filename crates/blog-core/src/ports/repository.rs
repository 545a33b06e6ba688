use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostPatch, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Load every entity.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Insert a new entity. Unique-key clashes surface as `RepoError::Constraint`.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Missing rows surface as `RepoError::NotFound`.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username (case-sensitive).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Load the users with the given ids. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Result of an atomic like attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LikeOutcome {
    Liked(Post),
    AlreadyLiked,
    NotFound,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn find_by_title_and_author(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Write only the fields present in `patch`, leaving the liked-by set
    /// as stored. A `(title, author)` clash surfaces as
    /// `RepoError::Constraint`, a missing post as `RepoError::NotFound`.
    async fn update_fields(&self, post_id: Uuid, patch: PostPatch) -> Result<Post, RepoError>;

    /// Append `user_id` to the post's liked-by set and set its like count,
    /// as a single conditional write that only applies when the user is not
    /// already a member.
    async fn add_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        likes: i64,
    ) -> Result<LikeOutcome, RepoError>;
}
