//! Port abstraction for room persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{PageRequest, Room, RoomId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by room repository adapters.
    pub enum RoomPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "room repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "room repository query failed: {message}",
        /// No room exists with the given identifier.
        NotFound => "room not found",
        /// Bookings still reference the room.
        StillReferenced => "room is still referenced by bookings",
    }
}

/// Storage for bookable rooms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Persist a new room.
    async fn insert(&self, room: &Room) -> Result<(), RoomPersistenceError>;

    /// Replace the stored state of an existing room.
    async fn update(&self, room: &Room) -> Result<(), RoomPersistenceError>;

    /// Remove a room; fails with `NotFound` when absent.
    async fn delete(&self, id: &RoomId) -> Result<(), RoomPersistenceError>;

    /// Fetch a room by identifier.
    async fn find_by_id(&self, id: &RoomId) -> Result<Option<Room>, RoomPersistenceError>;

    /// List rooms in creation order.
    async fn list(&self, page: PageRequest) -> Result<Vec<Room>, RoomPersistenceError>;

    /// Whether any booking references the room.
    async fn has_bookings(&self, id: &RoomId) -> Result<bool, RoomPersistenceError>;
}
