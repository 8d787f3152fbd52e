//! Port abstraction for booking persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Booking, BookingFilter, BookingId, PageRequest};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by booking repository adapters.
    pub enum BookingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
        /// No booking exists with the given identifier.
        NotFound => "booking not found",
        /// The referenced room or user does not exist.
        MissingReference { entity: BookingReference } => "referenced {entity} does not exist",
    }
}

/// Entity a booking points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingReference {
    Room,
    User,
}

impl std::fmt::Display for BookingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Room => f.write_str("room"),
            Self::User => f.write_str("user"),
        }
    }
}

/// Storage for bookings.
///
/// Adapters reject bookings whose room or user is missing with
/// [`BookingPersistenceError::MissingReference`], covering rows deleted
/// between the service's existence check and the write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking.
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError>;

    /// Replace the stored state of an existing booking.
    async fn update(&self, booking: &Booking) -> Result<(), BookingPersistenceError>;

    /// Remove a booking; fails with `NotFound` when absent.
    async fn delete(&self, id: &BookingId) -> Result<(), BookingPersistenceError>;

    /// Fetch a booking by identifier.
    async fn find_by_id(&self, id: &BookingId)
    -> Result<Option<Booking>, BookingPersistenceError>;

    /// List bookings passing `filter`, ordered by start time.
    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingPersistenceError>;
}
