//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{NewPost, Owner, Post, PostDetails, PostPatch};
pub use user::{NewUser, User, UserDetails};

/// Shortest accepted title, author or url.
pub const TEXT_MIN_LEN: usize = 3;
/// Longest accepted title, author or url.
pub const TEXT_MAX_LEN: usize = 100;
/// Shortest accepted username and password.
pub const CREDENTIAL_MIN_LEN: usize = 3;
