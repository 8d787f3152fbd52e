//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, and the services implementing the driving ports. Types are
//! constructed through validating constructors so an instance always
//! satisfies its documented invariants.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `Room`, `Booking` with their identifiers and value types.
//! - `PageRequest`: offset pagination for list queries.
//! - `UserService`, `RoomService`, `BookingService`: driving port
//!   implementations.

pub mod booking;
pub mod error;
pub mod id;
pub mod pagination;
pub mod ports;
pub mod room;
pub mod trace_id;
pub mod user;

mod booking_service;
mod room_service;
mod user_service;

pub use self::booking::{
    Booking, BookingChanges, BookingFilter, BookingPurpose, BookingValidationError, NewBooking,
    TimeSlot,
};
pub use self::booking_service::BookingService;
pub use self::error::{Error, ErrorCode};
pub use self::id::{BookingId, IdValidationError, RoomId, UserId};
pub use self::pagination::PageRequest;
pub use self::room::{
    Capacity, NewRoom, Room, RoomChanges, RoomLocation, RoomName, RoomValidationError,
};
pub use self::room_service::RoomService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, PasswordHash, PlainPassword, User, UserChanges, UserValidationError,
    Username,
};
pub use self::user_service::UserService;
