//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{PasswordService, PostRepository, RateLimiter, TokenService, UserRepository};
use blog_core::{AccountService, PostService};
use blog_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use blog_infra::{PostgresPostRepository, PostgresUserRepository};
#[cfg(feature = "rate-limit")]
use blog_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    /// Limiter for the credential endpoints, when enabled.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    #[cfg(feature = "postgres")]
    pub db: Option<sea_orm::DbConn>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        let mut state = match connect_store(config).await {
            Some(db) => {
                let users: Arc<dyn UserRepository> =
                    Arc::new(PostgresUserRepository::new(db.clone()));
                let posts: Arc<dyn PostRepository> =
                    Arc::new(PostgresPostRepository::new(db.clone()));
                let mut state = Self::build(users, posts, passwords, tokens);
                state.db = Some(db);
                state
            }
            None => Self::in_memory(tokens, passwords),
        };

        #[cfg(not(feature = "postgres"))]
        let mut state = {
            tracing::info!("Running without postgres feature - using in-memory store");
            Self::in_memory(tokens, passwords)
        };

        #[cfg(feature = "rate-limit")]
        {
            state.rate_limiter = match InMemoryRateLimiter::new(config.rate_limit.clone()) {
                Ok(limiter) => Some(Arc::new(limiter)),
                Err(e) => {
                    tracing::warn!("Rate limiting disabled: {}", e);
                    None
                }
            };
        }

        tracing::info!("Application state initialized");
        state
    }

    /// State backed by the in-memory store.
    pub fn in_memory(tokens: Arc<dyn TokenService>, passwords: Arc<dyn PasswordService>) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
        Self::build(users, posts, passwords, tokens)
    }

    fn build(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            posts: PostService::new(posts.clone(), users.clone()),
            accounts: AccountService::new(users, posts, passwords, tokens.clone()),
            tokens,
            rate_limiter: None,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

/// Connect to the configured database, falling back to `None` (in-memory
/// mode) when it is unset or unreachable.
#[cfg(feature = "postgres")]
async fn connect_store(config: &AppConfig) -> Option<sea_orm::DbConn> {
    use migration::{Migrator, MigratorTrait};

    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return None;
    };

    let db = match blog_infra::database::connect(db_config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return None;
        }
    };

    if config.run_migrations {
        if let Err(e) = Migrator::up(&db, None).await {
            tracing::error!("Migrations failed: {}. Using in-memory fallback.", e);
            return None;
        }
        tracing::info!("Migrations applied");
    }

    Some(db)
}
