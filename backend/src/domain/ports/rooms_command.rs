//! Driving port for room mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewRoom, Room, RoomChanges, RoomId};

/// Domain use-case port for creating, editing, and removing rooms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomsCommand: Send + Sync {
    /// Create a room.
    async fn create(&self, request: NewRoom) -> Result<Room, Error>;

    /// Apply a partial update to an existing room.
    async fn update(&self, id: &RoomId, changes: RoomChanges) -> Result<Room, Error>;

    /// Remove a room that no booking references.
    async fn delete(&self, id: &RoomId) -> Result<(), Error>;
}
