//! In-memory repositories - used when no database is configured.
//!
//! Records are kept in insertion order. Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Post, PostPatch, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, LikeOutcome, PostRepository, UserRepository};

/// In-memory user store. Usernames are unique.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.users.read().await.clone())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

/// In-memory post store. `(title, author)` pairs are unique.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts
            .iter()
            .any(|p| p.id == post.id || (p.title == post.title && p.author == post.author))
        {
            return Err(RepoError::Constraint(format!(
                "post '{}' by '{}' already exists",
                post.title, post.author
            )));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_title_and_author(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .find(|p| p.title == title && p.author == author)
            .cloned())
    }

    async fn update_fields(&self, post_id: Uuid, patch: PostPatch) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let current = posts
            .iter()
            .find(|p| p.id == post_id)
            .ok_or(RepoError::NotFound)?;

        let title = patch.title.as_deref().unwrap_or(&current.title);
        let author = patch.author.as_deref().unwrap_or(&current.author);
        if posts
            .iter()
            .any(|p| p.id != post_id && p.title == title && p.author == author)
        {
            return Err(RepoError::Constraint(format!(
                "post '{title}' by '{author}' already exists"
            )));
        }

        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(RepoError::NotFound)?;
        post.apply(patch);
        Ok(post.clone())
    }

    async fn add_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        likes: i64,
    ) -> Result<LikeOutcome, RepoError> {
        // Membership check and append happen under one write lock.
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(LikeOutcome::NotFound);
        };
        if post.is_liked_by(user_id) {
            return Ok(LikeOutcome::AlreadyLiked);
        }
        post.record_like(user_id, likes);
        Ok(LikeOutcome::Liked(post.clone()))
    }
}
