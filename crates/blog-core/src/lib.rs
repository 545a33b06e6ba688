//! # Blog Core
//!
//! The domain layer of the bloglist backend.
//! Entities, ports and the access-control rules for post mutations live here;
//! storage and crypto are reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod stats;

pub use error::DomainError;
pub use services::{AccountService, PostService};
