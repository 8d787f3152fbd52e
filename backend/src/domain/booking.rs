//! Booking data model.
//!
//! A booking reserves one room for one user over a half-open time slot.
//! Overlapping bookings of the same room are permitted.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{BookingId, Capacity, RoomId, UserId};

/// Maximum allowed length for a booking purpose.
pub const PURPOSE_MAX: usize = 500;

/// Validation errors returned by the booking value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    StartNotBeforeEnd,
    PurposeTooLong { max: usize },
}

impl fmt::Display for BookingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartNotBeforeEnd => write!(f, "start time must be before end time"),
            Self::PurposeTooLong { max } => {
                write!(f, "purpose must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for BookingValidationError {}

/// Reserved interval `[start, end)`.
///
/// ## Invariants
/// - `start < end`.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use room_booker::domain::TimeSlot;
///
/// let start = Utc::now();
/// assert!(TimeSlot::new(start, start + Duration::hours(1)).is_ok());
/// assert!(TimeSlot::new(start, start).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeSlot {
    /// Validate and construct a slot.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, BookingValidationError> {
        if start >= end {
            return Err(BookingValidationError::StartNotBeforeEnd);
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Optional free-form description of why the room is booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPurpose(String);

impl BookingPurpose {
    /// Validate a purpose; blank input yields `None`.
    pub fn parse(raw: impl AsRef<str>) -> Result<Option<Self>, BookingValidationError> {
        let purpose = raw.as_ref().trim();
        if purpose.is_empty() {
            return Ok(None);
        }
        if purpose.chars().count() > PURPOSE_MAX {
            return Err(BookingValidationError::PurposeTooLong { max: PURPOSE_MAX });
        }
        Ok(Some(Self(purpose.to_owned())))
    }
}

impl AsRef<str> for BookingPurpose {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Reservation of a room by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    id: BookingId,
    room_id: RoomId,
    user_id: UserId,
    slot: TimeSlot,
    purpose: Option<BookingPurpose>,
}

impl Booking {
    /// Build a [`Booking`] from validated components.
    #[must_use]
    pub fn new(
        id: BookingId,
        room_id: RoomId,
        user_id: UserId,
        slot: TimeSlot,
        purpose: Option<BookingPurpose>,
    ) -> Self {
        Self {
            id,
            room_id,
            user_id,
            slot,
            purpose,
        }
    }

    #[must_use]
    pub fn id(&self) -> &BookingId {
        &self.id
    }

    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn slot(&self) -> TimeSlot {
        self.slot
    }

    #[must_use]
    pub fn purpose(&self) -> Option<&BookingPurpose> {
        self.purpose.as_ref()
    }

    /// Apply partial changes.
    ///
    /// The resulting slot is revalidated because either bound may change
    /// independently of the other.
    pub fn apply(self, changes: BookingChanges) -> Result<Self, BookingValidationError> {
        let start = changes.start.unwrap_or(self.slot.start);
        let end = changes.end.unwrap_or(self.slot.end);
        Ok(Self {
            id: self.id,
            room_id: changes.room_id.unwrap_or(self.room_id),
            user_id: changes.user_id.unwrap_or(self.user_id),
            slot: TimeSlot::new(start, end)?,
            purpose: changes.purpose.unwrap_or(self.purpose),
        })
    }
}

/// Creation request for a booking.
///
/// `required_capacity`, when present, must not exceed the room's capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub slot: TimeSlot,
    pub purpose: Option<BookingPurpose>,
    pub required_capacity: Option<Capacity>,
}

/// Partial update of a booking; `purpose` follows the same doubly optional
/// convention as [`super::RoomChanges::location`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingChanges {
    pub room_id: Option<RoomId>,
    pub user_id: Option<UserId>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub purpose: Option<Option<BookingPurpose>>,
    pub required_capacity: Option<Capacity>,
}

/// Narrowing applied when listing bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub room_id: Option<RoomId>,
    pub user_id: Option<UserId>,
}

impl BookingFilter {
    /// Whether a booking passes the filter.
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.room_id.is_none_or(|id| id == booking.room_id)
            && self.user_id.is_none_or(|id| id == booking.user_id)
    }
}
