use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CREDENTIAL_MIN_LEN;
use super::Owner;
use crate::error::DomainError;

/// User entity - represents a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public identity shown next to the user's posts.
    pub fn owner(&self) -> Owner {
        Owner {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

/// Registration input, before the password is hashed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.is_empty() {
            return Err(DomainError::Validation("Username required".to_string()));
        }
        if self.username.chars().count() < CREDENTIAL_MIN_LEN {
            return Err(DomainError::Validation("Username too short".to_string()));
        }
        if self.password.chars().count() < CREDENTIAL_MIN_LEN {
            return Err(DomainError::Validation("Password too short".to_string()));
        }
        Ok(())
    }
}

/// A user and the ids of the posts they own.
#[derive(Debug, Clone)]
pub struct UserDetails {
    pub user: User,
    pub posts: Vec<Uuid>,
}
