//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod bookings;
pub mod error;
pub mod health;
pub mod pagination;
pub mod rooms;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register extractor configuration and every resource handler.
///
/// Mount under `/api/v1`; the paths documented in [`crate::doc::ApiDoc`]
/// assume that prefix.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use room_booker::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(users::create_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(rooms::create_room)
        .service(rooms::list_rooms)
        .service(rooms::get_room)
        .service(rooms::update_room)
        .service(rooms::delete_room)
        .service(bookings::create_booking)
        .service(bookings::list_bookings)
        .service(bookings::get_booking)
        .service(bookings::update_booking)
        .service(bookings::delete_booking);
}
