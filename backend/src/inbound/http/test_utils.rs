//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{BookingService, PasswordHash, PlainPassword, RoomService, UserService};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

/// Hasher that skips key stretching so handler tests stay fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastPasswordHasher;

impl PasswordHasher for FastPasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHashError> {
        PasswordHash::new(format!("$test${}", password.expose().len()))
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }
}

/// Build HTTP state over the real domain services and a fresh in-memory
/// store.
pub fn in_memory_state() -> HttpState {
    let (users, rooms, bookings) = InMemoryStore::new().repositories();
    let users = Arc::new(users);
    let rooms = Arc::new(rooms);
    let bookings = Arc::new(bookings);

    let user_service = Arc::new(UserService::new(users.clone(), Arc::new(FastPasswordHasher)));
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

/// Application wired like production: trace middleware, extractor
/// configuration, and every API route under `/api/v1`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
}
