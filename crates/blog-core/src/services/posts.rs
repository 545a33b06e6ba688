//! Post mutation rules: ownership checks and at-most-once likes.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Owner, Post, PostDetails, PostPatch, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{LikeOutcome, PostRepository, UserRepository};
use crate::stats::{self, PostStats};

/// Post operations on behalf of an authenticated caller.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// All posts with owners resolved, most liked first.
    pub async fn list_posts(&self) -> Result<Vec<PostDetails>, DomainError> {
        let mut posts = self.posts.find_all().await?;
        // Stable sort, so equally liked posts keep store order.
        posts.sort_by(|a, b| b.likes.cmp(&a.likes));
        self.with_owners(posts).await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostDetails, DomainError> {
        let post = self.find_existing(post_id).await?;
        self.with_owner(post).await
    }

    /// Totals over all posts, in store order.
    pub async fn stats(&self) -> Result<PostStats, DomainError> {
        let posts = self.posts.find_all().await?;

        let favorite = match stats::favorite_post(&posts).cloned() {
            Some(post) => Some(self.with_owner(post).await?),
            None => None,
        };

        Ok(PostStats {
            total_likes: stats::total_likes(&posts),
            favorite,
            most_posts: stats::most_posts(&posts),
        })
    }

    /// Create a post owned by `caller`, unless one with the same title and
    /// author already exists.
    pub async fn create_post(
        &self,
        caller: &User,
        new_post: NewPost,
    ) -> Result<PostDetails, DomainError> {
        new_post.validate()?;

        if let Some(existing) = self
            .posts
            .find_by_title_and_author(&new_post.title, &new_post.author)
            .await?
        {
            tracing::debug!(post_id = %existing.id, "Rejecting duplicate post");
            return Err(self.duplicate(existing).await);
        }

        let (title, author) = (new_post.title.clone(), new_post.author.clone());
        let post = Post::new(caller.id, new_post);
        let created = match self.posts.create(post).await {
            Ok(created) => created,
            // Lost a race against an identical insert.
            Err(RepoError::Constraint(_)) => return Err(self.duplicate_of(&title, &author).await?),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(post_id = %created.id, user_id = %caller.id, "Post created");

        Ok(PostDetails {
            post: created,
            owner: Some(caller.owner()),
        })
    }

    /// Record a like from `caller`, setting the count to `requested_likes`.
    ///
    /// A user can like a post once. The requested count must exceed the
    /// current one.
    pub async fn like_post(
        &self,
        caller: &User,
        post_id: Uuid,
        requested_likes: i64,
    ) -> Result<PostDetails, DomainError> {
        let post = self.find_existing(post_id).await?;

        if post.is_liked_by(caller.id) {
            return Err(DomainError::AlreadyLiked);
        }
        if requested_likes <= post.likes {
            return Err(DomainError::Validation(format!(
                "Likes must be greater than {}",
                post.likes
            )));
        }

        match self.posts.add_like(post_id, caller.id, requested_likes).await? {
            LikeOutcome::Liked(post) => {
                tracing::info!(post_id = %post_id, user_id = %caller.id, likes = post.likes, "Post liked");
                self.with_owner(post).await
            }
            LikeOutcome::AlreadyLiked => Err(DomainError::AlreadyLiked),
            LikeOutcome::NotFound => Err(DomainError::post_not_found(post_id)),
        }
    }

    /// Like a post, bumping its count by one.
    pub async fn like_once(&self, caller: &User, post_id: Uuid) -> Result<PostDetails, DomainError> {
        let post = self.find_existing(post_id).await?;
        self.like_post(caller, post_id, post.likes.saturating_add(1))
            .await
    }

    /// Owner-only field update. Never touches the liked-by set.
    pub async fn update_post(
        &self,
        caller: &User,
        post_id: Uuid,
        patch: PostPatch,
    ) -> Result<PostDetails, DomainError> {
        let post = self.find_existing(post_id).await?;

        if !post.is_owned_by(caller.id) {
            tracing::warn!(post_id = %post_id, user_id = %caller.id, "Update by non-owner refused");
            return Err(DomainError::Forbidden(
                "only the creator can update".to_string(),
            ));
        }
        patch.validate()?;

        let title = patch.title.clone().unwrap_or(post.title);
        let author = patch.author.clone().unwrap_or(post.author);
        let updated = match self.posts.update_fields(post_id, patch).await {
            Ok(updated) => updated,
            Err(RepoError::NotFound) => return Err(DomainError::post_not_found(post_id)),
            // Renamed onto another post's title and author.
            Err(RepoError::Constraint(_)) => return Err(self.duplicate_of(&title, &author).await?),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(post_id = %post_id, "Post updated");
        self.with_owner(updated).await
    }

    /// Single entry point behind `PUT /posts/{id}`.
    ///
    /// A `likes` value above the current count is a like; anything else is an
    /// owner update.
    pub async fn apply_put(
        &self,
        caller: &User,
        post_id: Uuid,
        patch: PostPatch,
    ) -> Result<PostDetails, DomainError> {
        let post = self.find_existing(post_id).await?;

        match patch.likes {
            Some(likes) if likes > post.likes => self.like_post(caller, post_id, likes).await,
            _ => self.update_post(caller, post_id, patch).await,
        }
    }

    /// Owner-only delete.
    pub async fn delete_post(&self, caller: &User, post_id: Uuid) -> Result<(), DomainError> {
        let post = self.find_existing(post_id).await?;

        if !post.is_owned_by(caller.id) {
            tracing::warn!(post_id = %post_id, user_id = %caller.id, "Delete by non-owner refused");
            return Err(DomainError::Forbidden(
                "only the creator can delete".to_string(),
            ));
        }

        self.posts.delete(post_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(post_id),
            other => other.into(),
        })?;

        tracing::info!(post_id = %post_id, user_id = %caller.id, "Post deleted");
        Ok(())
    }

    async fn find_existing(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    /// The error for a unique-pair clash reported by the store.
    async fn duplicate_of(&self, title: &str, author: &str) -> Result<DomainError, DomainError> {
        match self.posts.find_by_title_and_author(title, author).await? {
            Some(existing) => Ok(self.duplicate(existing).await),
            None => Err(DomainError::Internal(
                "post constraint violated without a conflicting post".to_string(),
            )),
        }
    }

    async fn duplicate(&self, existing: Post) -> DomainError {
        match self.with_owner(existing).await {
            Ok(details) => DomainError::DuplicatePost(Box::new(details)),
            Err(e) => e,
        }
    }

    async fn with_owner(&self, post: Post) -> Result<PostDetails, DomainError> {
        let owner = self
            .users
            .find_by_id(post.user_id)
            .await?
            .map(|user| user.owner());

        Ok(PostDetails { post, owner })
    }

    async fn with_owners(&self, posts: Vec<Post>) -> Result<Vec<PostDetails>, DomainError> {
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.user_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let owners: HashMap<Uuid, Owner> = self
            .users
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.owner()))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let owner = owners.get(&post.user_id).cloned();
                PostDetails { post, owner }
            })
            .collect())
    }
}
