//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, PageRequest, User, UserId};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// List users in creation order.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, Error>;

    /// Fetch one user; missing users surface as `not_found`.
    async fn get(&self, id: &UserId) -> Result<User, Error>;
}
