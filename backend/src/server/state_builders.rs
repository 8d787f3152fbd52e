//! Builders for HTTP state ports backed by Diesel or the in-memory store.

use std::sync::Arc;

use room_booker::domain::ports::{BookingRepository, PasswordHasher, RoomRepository, UserRepository};
use room_booker::domain::{BookingService, RoomService, UserService};
use room_booker::inbound::http::state::{HttpState, HttpStatePorts};
use room_booker::outbound::memory::InMemoryStore;
use room_booker::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselRoomRepository, DieselUserRepository,
};
use room_booker::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Wire the domain services over one set of repositories.
fn build_with_repositories<U, R, B>(
    users: Arc<U>,
    rooms: Arc<R>,
    bookings: Arc<B>,
    hasher: Arc<impl PasswordHasher + 'static>,
) -> HttpState
where
    U: UserRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
{
    let user_service = Arc::new(UserService::new(users.clone(), hasher));
    let room_service = Arc::new(RoomService::new(rooms.clone()));
    let booking_service = Arc::new(BookingService::new(bookings, rooms, users));

    HttpState::new(HttpStatePorts {
        users: user_service.clone(),
        users_query: user_service,
        rooms: room_service.clone(),
        rooms_query: room_service,
        bookings: booking_service.clone(),
        bookings_query: booking_service,
    })
}

fn build_diesel_state(pool: &DbPool) -> HttpState {
    build_with_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselRoomRepository::new(pool.clone())),
        Arc::new(DieselBookingRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher),
    )
}

fn build_in_memory_state() -> HttpState {
    let (users, rooms, bookings) = InMemoryStore::new().repositories();
    build_with_repositories(
        Arc::new(users),
        Arc::new(rooms),
        Arc::new(bookings),
        Arc::new(Argon2PasswordHasher),
    )
}

/// Build HTTP state from the server configuration.
///
/// Uses the Diesel repositories when a pool is configured, otherwise a fresh
/// in-memory store that lives as long as the process.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => build_diesel_state(pool),
        None => build_in_memory_state(),
    }
}
