//! Application services - the rules applied on top of the ports.

mod accounts;
mod posts;

pub use accounts::{AccountService, Session};
pub use posts::PostService;
