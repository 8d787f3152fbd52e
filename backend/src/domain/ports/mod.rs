//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented by
//! the domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_repository;
mod bookings_command;
mod bookings_query;
mod password_hasher;
mod room_repository;
mod rooms_command;
mod rooms_query;
mod user_repository;
mod users_command;
mod users_query;

pub use booking_repository::{BookingPersistenceError, BookingReference, BookingRepository};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use bookings_command::BookingsCommand;
#[cfg(test)]
pub use bookings_command::MockBookingsCommand;
pub use bookings_query::BookingsQuery;
#[cfg(test)]
pub use bookings_query::MockBookingsQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use room_repository::MockRoomRepository;
pub use room_repository::{RoomPersistenceError, RoomRepository};
#[cfg(test)]
pub use rooms_command::MockRoomsCommand;
pub use rooms_command::RoomsCommand;
#[cfg(test)]
pub use rooms_query::MockRoomsQuery;
pub use rooms_query::RoomsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
