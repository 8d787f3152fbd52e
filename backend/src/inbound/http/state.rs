//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookingsCommand, BookingsQuery, RoomsCommand, RoomsQuery, UsersCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub rooms: Arc<dyn RoomsCommand>,
    pub rooms_query: Arc<dyn RoomsQuery>,
    pub bookings: Arc<dyn BookingsCommand>,
    pub bookings_query: Arc<dyn BookingsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub rooms: Arc<dyn RoomsCommand>,
    pub rooms_query: Arc<dyn RoomsQuery>,
    pub bookings: Arc<dyn BookingsCommand>,
    pub bookings_query: Arc<dyn BookingsQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            users_query,
            rooms,
            rooms_query,
            bookings,
            bookings_query,
        } = ports;
        Self {
            users,
            users_query,
            rooms,
            rooms_query,
            bookings,
            bookings_query,
        }
    }
}
