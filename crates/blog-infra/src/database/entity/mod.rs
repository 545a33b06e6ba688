//! SeaORM entities backing the Postgres repositories.

pub mod post;
pub mod user;
