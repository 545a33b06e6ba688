//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod rate_limit;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use rate_limit::{RateLimitDecision, RateLimitError, RateLimiter};
pub use repository::{BaseRepository, LikeOutcome, PostRepository, UserRepository};
