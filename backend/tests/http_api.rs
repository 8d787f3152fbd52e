//! End-to-end HTTP behaviour over the in-memory store.
//!
//! Builds the application from the public library surface, the same way the
//! server binary does, and walks the cross-resource rules.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use room_booker::Trace;
use room_booker::domain::ports::{PasswordHashError, PasswordHasher};
use room_booker::domain::{BookingService, PasswordHash, PlainPassword, RoomService, UserService};
use room_booker::inbound::http::configure_api;
use room_booker::inbound::http::state::{HttpState, HttpStatePorts};
use room_booker::outbound::memory::InMemoryStore;

/// Skips key stretching; hashing cost is covered by the adapter's own tests.
struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHashError> {
        PasswordHash::new(format!("$plain${}", password.expose().len()))
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }
}

#[fixture]
fn state() -> HttpState {
    let (users, rooms, bookings) = InMemoryStore::new().repositories();
    let users = Arc::new(users);
    let rooms = Arc::new(rooms);
    let user_service = Arc::new(UserService::new(users.clone(), Arc::new(PlainTextHasher)));
    let room_service = Arc::new(RoomService::new(rooms.clone()));
    let booking_service = Arc::new(BookingService::new(Arc::new(bookings), rooms, users));
    HttpState::new(HttpStatePorts {
        users: user_service.clone(),
        users_query: user_service,
        rooms: room_service.clone(),
        rooms_query: room_service,
        bookings: booking_service.clone(),
        bookings_query: booking_service,
    })
}

macro_rules! init_app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(configure_api)),
        )
        .await
    };
}

fn field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

#[rstest]
#[actix_web::test]
async fn rooms_and_bookings_round_trip(state: HttpState) {
    let app = init_app!(state);

    let user: Value = actix_test::call_and_read_body_json(
        &app,
        TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": "correct horse",
            }))
            .to_request(),
    )
    .await;
    let room: Value = actix_test::call_and_read_body_json(
        &app,
        TestRequest::post()
            .uri("/api/v1/rooms")
            .set_json(json!({ "name": "Library", "capacity": 12, "location": "Level 2" }))
            .to_request(),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .set_json(json!({
                "roomId": field(&room, "id"),
                "userId": field(&user, "id"),
                "startTime": "2026-03-02T09:00:00Z",
                "endTime": "2026-03-02T09:00:00Z",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = actix_test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .set_json(json!({
                "roomId": field(&room, "id"),
                "userId": field(&user, "id"),
                "startTime": "2026-03-02T09:00:00Z",
                "endTime": "2026-03-02T10:30:00Z",
                "requiredCapacity": 10,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking: Value = actix_test::read_body_json(response).await;
    assert_eq!(field(&booking, "roomId"), field(&room, "id"));

    // Clearing the location leaves the other fields intact.
    let updated: Value = actix_test::call_and_read_body_json(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/rooms/{}", field(&room, "id")))
            .set_json(json!({ "location": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated.get("location"), Some(&Value::Null));
    assert_eq!(field(&updated, "name"), "Library");
    assert_eq!(updated.get("capacity").and_then(Value::as_i64), Some(12));

    let listed: Value = actix_test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/bookings?roomId={}", field(&room, "id")))
            .to_request(),
    )
    .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case("/api/v1/users/3fa85f64-5717-4562-b3fc-2c963f66afa6", "User not found")]
#[case("/api/v1/rooms/3fa85f64-5717-4562-b3fc-2c963f66afa6", "Room not found")]
#[case("/api/v1/bookings/3fa85f64-5717-4562-b3fc-2c963f66afa6", "Booking not found")]
#[actix_web::test]
async fn unknown_resources_are_not_found(
    state: HttpState,
    #[case] uri: &str,
    #[case] message: &str,
) {
    let app = init_app!(state);
    let response = actix_test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let trace_header = response
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(field(&body, "code"), "not_found");
    assert_eq!(field(&body, "message"), message);
    assert_eq!(trace_header.as_deref(), body.get("traceId").and_then(Value::as_str));
}

#[rstest]
#[actix_web::test]
async fn room_capacity_bounds_are_enforced(state: HttpState) {
    let app = init_app!(state);
    for capacity in [0, 10_001] {
        let response = actix_test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/v1/rooms")
                .set_json(json!({ "name": "Pod", "capacity": capacity }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("capacity")
        );
    }
}
