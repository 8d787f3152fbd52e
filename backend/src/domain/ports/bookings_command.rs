//! Driving port for booking mutations.
//!
//! Bookings are not checked for overlap: two bookings may hold the same room
//! at the same time.

use async_trait::async_trait;

use crate::domain::{Booking, BookingChanges, BookingId, Error, NewBooking};

/// Domain use-case port for creating, editing, and removing bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsCommand: Send + Sync {
    /// Book a room for a user.
    async fn create(&self, request: NewBooking) -> Result<Booking, Error>;

    /// Apply a partial update to an existing booking.
    async fn update(&self, id: &BookingId, changes: BookingChanges) -> Result<Booking, Error>;

    /// Remove a booking.
    async fn delete(&self, id: &BookingId) -> Result<(), Error>;
}
