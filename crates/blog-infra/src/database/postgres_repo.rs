//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbBackend, EntityTrait, QueryFilter, QueryOrder, Statement,
};
use uuid::Uuid;

use blog_core::domain::{Post, PostPatch, User};
use blog_core::error::RepoError;
use blog_core::ports::{LikeOutcome, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Append the liker and set the count in one statement, guarded on
/// membership so concurrent likes from the same user apply at most once.
const ADD_LIKE_SQL: &str = r#"UPDATE posts
SET liked_by = array_append(liked_by, $2),
    likes = $3,
    updated_at = now()
WHERE id = $1 AND NOT ($2 = ANY(liked_by))
RETURNING *"#;

/// Active model touching only the patched columns and `updated_at`.
pub(crate) fn patch_model(post_id: Uuid, patch: PostPatch) -> post::ActiveModel {
    post::ActiveModel {
        id: Unchanged(post_id),
        title: patch.title.map_or(NotSet, Set),
        author: patch.author.map_or(NotSet, Set),
        url: patch.url.map_or(NotSet, Set),
        likes: patch.likes.map_or(NotSet, Set),
        updated_at: Set(chrono::Utc::now().into()),
        ..<post::ActiveModel as ActiveModelTrait>::default()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_asc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_title_and_author(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Title.eq(title))
            .filter(post::Column::Author.eq(author))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn update_fields(&self, post_id: Uuid, patch: PostPatch) -> Result<Post, RepoError> {
        let model = patch_model(post_id, patch)
            .update(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(model.into())
    }

    async fn add_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        likes: i64,
    ) -> Result<LikeOutcome, RepoError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            ADD_LIKE_SQL,
            [post_id.into(), user_id.into(), likes.into()],
        );

        let updated = PostEntity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        if let Some(model) = updated {
            return Ok(LikeOutcome::Liked(model.into()));
        }

        // Nothing matched: either the post is gone or the user is already in.
        let exists = PostEntity::find_by_id(post_id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .is_some();

        Ok(if exists {
            LikeOutcome::AlreadyLiked
        } else {
            LikeOutcome::NotFound
        })
    }
}
