//! Driving port for booking queries.

use async_trait::async_trait;

use crate::domain::{Booking, BookingFilter, BookingId, Error, PageRequest};

/// Domain use-case port for reading bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsQuery: Send + Sync {
    /// List bookings matching `filter`, ordered by start time.
    async fn list(&self, filter: BookingFilter, page: PageRequest) -> Result<Vec<Booking>, Error>;

    /// Fetch one booking; missing bookings surface as `not_found`.
    async fn get(&self, id: &BookingId) -> Result<Booking, Error>;
}
