//! Driving port for user mutations.
//!
//! Inbound adapters call this port with validated domain values; the
//! implementation hashes passwords and translates repository failures into
//! domain errors.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserChanges, UserId};

/// Domain use-case port for registering, editing, and removing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a user, rejecting duplicate usernames or emails.
    async fn create(&self, request: NewUser) -> Result<User, Error>;

    /// Apply a partial update to an existing user.
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Remove a user that no booking references.
    async fn delete(&self, id: &UserId) -> Result<(), Error>;
}
