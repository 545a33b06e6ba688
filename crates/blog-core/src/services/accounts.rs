//! Registration, login and caller resolution.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewUser, User, UserDetails};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, PostRepository, TokenService, UserRepository};

/// A freshly issued login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Account operations.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            posts,
            passwords,
            tokens,
        }
    }

    /// Register a new user. The raw password is hashed and never stored.
    pub async fn register(&self, new_user: NewUser) -> Result<User, DomainError> {
        new_user.validate()?;

        let password_hash = self
            .passwords
            .hash(&new_user.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(new_user.username, new_user.name, password_hash);
        let saved = self.users.create(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::Duplicate("expected `username` to be unique".to_string())
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = %saved.id, "User registered");
        Ok(saved)
    }

    /// Check a username/password pair and issue a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::debug!("Login for unknown username");
            return Err(DomainError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .tokens
            .generate_token(user.id, &user.username)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tracing::info!(
            user_id = %user.id,
            expires_in = self.tokens.expiration_seconds(),
            "User logged in"
        );
        Ok(Session { token, user })
    }

    /// Load the user a verified token points at.
    pub async fn resolve_caller(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UnknownCaller)
    }

    /// Every user with the ids of the posts they own.
    pub async fn list_users(&self) -> Result<Vec<UserDetails>, DomainError> {
        let users = self.users.find_all().await?;

        let mut owned: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for post in self.posts.find_all().await? {
            owned.entry(post.user_id).or_default().push(post.id);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let posts = owned.remove(&user.id).unwrap_or_default();
                UserDetails { user, posts }
            })
            .collect())
    }

    /// One user with the ids of the posts they own.
    pub async fn user_details(&self, user_id: Uuid) -> Result<UserDetails, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "User",
                id: user_id,
            })?;
        let posts = self
            .posts
            .find_by_user_id(user_id)
            .await?
            .into_iter()
            .map(|post| post.id)
            .collect();

        Ok(UserDetails { user, posts })
    }
}
