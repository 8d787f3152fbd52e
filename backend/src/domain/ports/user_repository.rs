//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{PageRequest, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the username.
        DuplicateUsername => "username already registered",
        /// Another user already holds the email address.
        DuplicateEmail => "email already registered",
        /// No user exists with the given identifier.
        NotFound => "user not found",
        /// Bookings still reference the user.
        StillReferenced => "user is still referenced by bookings",
    }
}

/// Storage for registered users.
///
/// Adapters must enforce username and email uniqueness atomically so that
/// concurrent registrations cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace the stored state of an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a user; fails with `NotFound` when absent.
    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// List users in creation order.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, UserPersistenceError>;

    /// Whether any booking references the user.
    async fn has_bookings(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
