//! Driving port for room queries.

use async_trait::async_trait;

use crate::domain::{Error, PageRequest, Room, RoomId};

/// Domain use-case port for reading rooms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomsQuery: Send + Sync {
    /// List rooms in creation order.
    async fn list(&self, page: PageRequest) -> Result<Vec<Room>, Error>;

    /// Fetch one room; missing rooms surface as `not_found`.
    async fn get(&self, id: &RoomId) -> Result<Room, Error>;
}
