//! Booking domain service.
//!
//! Implements [`BookingsCommand`] and [`BookingsQuery`]. The service checks
//! that referenced rooms and users exist and that an optional required
//! capacity fits the room; it deliberately does not look for overlapping
//! bookings.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::room_service::{map_room_persistence_error, room_not_found};
use super::user_service::{map_user_persistence_error, user_not_found};
use crate::domain::ports::{
    BookingPersistenceError, BookingReference, BookingRepository, BookingsCommand, BookingsQuery,
    RoomRepository, UserRepository,
};
use crate::domain::{
    Booking, BookingChanges, BookingFilter, BookingId, BookingValidationError, Capacity, Error,
    NewBooking, PageRequest, Room, RoomId, UserId,
};

fn booking_not_found(id: &BookingId) -> Error {
    Error::not_found("Booking not found").with_details(json!({
        "id": id.to_string(),
        "code": "booking_not_found",
    }))
}

fn map_booking_persistence_error(error: BookingPersistenceError) -> Error {
    match error {
        BookingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        BookingPersistenceError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
        BookingPersistenceError::NotFound => Error::not_found("Booking not found"),
        BookingPersistenceError::MissingReference {
            entity: BookingReference::Room,
        } => Error::not_found("Room not found").with_details(json!({ "code": "room_not_found" })),
        BookingPersistenceError::MissingReference {
            entity: BookingReference::User,
        } => Error::not_found("User not found").with_details(json!({ "code": "user_not_found" })),
    }
}

fn invalid_time_slot(error: &BookingValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "endTime",
        "code": "invalid_time_slot",
    }))
}

fn ensure_capacity(room: &Room, required: Option<Capacity>) -> Result<(), Error> {
    match required {
        Some(required) if required > room.capacity() => {
            Err(Error::invalid_request("room capacity insufficient").with_details(json!({
                "field": "requiredCapacity",
                "code": "capacity_insufficient",
                "required": required.get(),
                "available": room.capacity().get(),
            })))
        }
        _ => Ok(()),
    }
}

/// Booking service implementing the booking driving ports.
#[derive(Clone)]
pub struct BookingService<B, R, U> {
    bookings: Arc<B>,
    rooms: Arc<R>,
    users: Arc<U>,
}

impl<B, R, U> BookingService<B, R, U> {
    /// Create a new service over the booking, room, and user repositories.
    pub fn new(bookings: Arc<B>, rooms: Arc<R>, users: Arc<U>) -> Self {
        Self {
            bookings,
            rooms,
            users,
        }
    }
}

impl<B, R, U> BookingService<B, R, U>
where
    B: BookingRepository,
    R: RoomRepository,
    U: UserRepository,
{
    async fn require(&self, id: &BookingId) -> Result<Booking, Error> {
        self.bookings
            .find_by_id(id)
            .await
            .map_err(map_booking_persistence_error)?
            .ok_or_else(|| booking_not_found(id))
    }

    async fn require_room(&self, id: &RoomId) -> Result<Room, Error> {
        self.rooms
            .find_by_id(id)
            .await
            .map_err(map_room_persistence_error)?
            .ok_or_else(|| room_not_found(id))
    }

    async fn require_user(&self, id: &UserId) -> Result<(), Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .map(|_| ())
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<B, R, U> BookingsCommand for BookingService<B, R, U>
where
    B: BookingRepository,
    R: RoomRepository,
    U: UserRepository,
{
    async fn create(&self, request: NewBooking) -> Result<Booking, Error> {
        let NewBooking {
            room_id,
            user_id,
            slot,
            purpose,
            required_capacity,
        } = request;
        let room = self.require_room(&room_id).await?;
        self.require_user(&user_id).await?;
        ensure_capacity(&room, required_capacity)?;

        let booking = Booking::new(BookingId::random(), room_id, user_id, slot, purpose);
        self.bookings
            .insert(&booking)
            .await
            .map_err(map_booking_persistence_error)?;
        info!(booking_id = %booking.id(), room_id = %room_id, "booking created");
        Ok(booking)
    }

    async fn update(&self, id: &BookingId, changes: BookingChanges) -> Result<Booking, Error> {
        let current = self.require(id).await?;
        let room_changed = changes.room_id.is_some();
        let user_changed = changes.user_id.is_some();
        let required_capacity = changes.required_capacity;
        let updated = current
            .apply(changes)
            .map_err(|err| invalid_time_slot(&err))?;

        if room_changed || required_capacity.is_some() {
            let room = self.require_room(updated.room_id()).await?;
            ensure_capacity(&room, required_capacity)?;
        }
        if user_changed {
            self.require_user(updated.user_id()).await?;
        }

        self.bookings
            .update(&updated)
            .await
            .map_err(map_booking_persistence_error)?;
        Ok(updated)
    }

    async fn delete(&self, id: &BookingId) -> Result<(), Error> {
        self.bookings
            .delete(id)
            .await
            .map_err(|err| match err {
                BookingPersistenceError::NotFound => booking_not_found(id),
                other => map_booking_persistence_error(other),
            })?;
        info!(booking_id = %id, "booking deleted");
        Ok(())
    }
}

#[async_trait]
impl<B, R, U> BookingsQuery for BookingService<B, R, U>
where
    B: BookingRepository,
    R: RoomRepository,
    U: UserRepository,
{
    async fn list(&self, filter: BookingFilter, page: PageRequest) -> Result<Vec<Booking>, Error> {
        self.bookings
            .list(filter, page)
            .await
            .map_err(map_booking_persistence_error)
    }

    async fn get(&self, id: &BookingId) -> Result<Booking, Error> {
        self.require(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockBookingRepository, MockRoomRepository, MockUserRepository};
    use crate::domain::{
        BookingPurpose, EmailAddress, ErrorCode, PasswordHash, RoomName, TimeSlot, User,
        Username,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    type Service = BookingService<MockBookingRepository, MockRoomRepository, MockUserRepository>;

    #[fixture]
    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 14, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn room() -> Room {
        Room::new(
            RoomId::random(),
            RoomName::new("Huddle").expect("name"),
            Capacity::new(4).expect("capacity"),
            None,
        )
    }

    #[fixture]
    fn user() -> User {
        User::new(
            UserId::random(),
            Username::new("ada").expect("username"),
            EmailAddress::new("ada@example.com").expect("email"),
            PasswordHash::new("$argon2id$hash").expect("hash"),
        )
    }

    fn rooms_holding(room: Option<Room>) -> MockRoomRepository {
        let mut rooms = MockRoomRepository::new();
        rooms
            .expect_find_by_id()
            .returning(move |_| Ok(room.clone()));
        rooms
    }

    fn users_holding(user: Option<User>) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(user.clone()));
        users
    }

    fn service(
        bookings: MockBookingRepository,
        rooms: MockRoomRepository,
        users: MockUserRepository,
    ) -> Service {
        BookingService::new(Arc::new(bookings), Arc::new(rooms), Arc::new(users))
    }

    fn request(room: &Room, user: &User, start: DateTime<Utc>) -> NewBooking {
        NewBooking {
            room_id: *room.id(),
            user_id: *user.id(),
            slot: TimeSlot::new(start, start + Duration::hours(1)).expect("slot"),
            purpose: BookingPurpose::parse("Planning").expect("purpose"),
            required_capacity: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_persists_booking(room: Room, user: User, start: DateTime<Utc>) {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_insert().times(1).returning(|_| Ok(()));
        let service = service(
            bookings,
            rooms_holding(Some(room.clone())),
            users_holding(Some(user.clone())),
        );

        let booking = service
            .create(request(&room, &user, start))
            .await
            .expect("booking created");

        assert_eq!(booking.room_id(), room.id());
        assert_eq!(booking.user_id(), user.id());
        assert_eq!(booking.slot().start(), start);
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_missing_room(room: Room, user: User, start: DateTime<Utc>) {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_insert().never();
        let service = service(bookings, rooms_holding(None), users_holding(Some(user.clone())));

        let error = service
            .create(request(&room, &user, start))
            .await
            .expect_err("missing room");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Room not found");
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_missing_user(room: Room, user: User, start: DateTime<Utc>) {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_insert().never();
        let service = service(bookings, rooms_holding(Some(room.clone())), users_holding(None));

        let error = service
            .create(request(&room, &user, start))
            .await
            .expect_err("missing user");

        assert_eq!(error.message(), "User not found");
    }

    #[rstest]
    #[case(4, None)]
    #[case(5, Some(ErrorCode::InvalidRequest))]
    #[tokio::test]
    async fn create_checks_required_capacity(
        room: Room,
        user: User,
        start: DateTime<Utc>,
        #[case] required: i64,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_insert().returning(|_| Ok(()));
        let service = service(
            bookings,
            rooms_holding(Some(room.clone())),
            users_holding(Some(user.clone())),
        );
        let mut booking = request(&room, &user, start);
        booking.required_capacity = Some(Capacity::new(required).expect("capacity"));

        let result = service.create(booking).await;

        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn create_maps_racing_reference_loss(room: Room, user: User, start: DateTime<Utc>) {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_insert()
            .returning(|_| Err(BookingPersistenceError::missing_reference(BookingReference::User)));
        let service = service(
            bookings,
            rooms_holding(Some(room.clone())),
            users_holding(Some(user.clone())),
        );

        let error = service
            .create(request(&room, &user, start))
            .await
            .expect_err("reference lost");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "User not found");
    }

    #[rstest]
    #[tokio::test]
    async fn update_rejects_inverted_slot(room: Room, user: User, start: DateTime<Utc>) {
        let stored = Booking::new(
            BookingId::random(),
            *room.id(),
            *user.id(),
            TimeSlot::new(start, start + Duration::hours(1)).expect("slot"),
            None,
        );
        let id = *stored.id();
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        bookings.expect_update().never();
        let service = service(bookings, rooms_holding(None), users_holding(None));

        let error = service
            .update(
                &id,
                BookingChanges {
                    start: Some(start + Duration::hours(2)),
                    ..BookingChanges::default()
                },
            )
            .await
            .expect_err("inverted slot");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(
            details.get("code").and_then(|v| v.as_str()),
            Some("invalid_time_slot")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn update_purpose_only_skips_reference_checks(
        room: Room,
        user: User,
        start: DateTime<Utc>,
    ) {
        let stored = Booking::new(
            BookingId::random(),
            *room.id(),
            *user.id(),
            TimeSlot::new(start, start + Duration::hours(1)).expect("slot"),
            None,
        );
        let id = *stored.id();
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        bookings.expect_update().times(1).returning(|_| Ok(()));
        let mut rooms = MockRoomRepository::new();
        rooms.expect_find_by_id().never();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        let service = service(bookings, rooms, users);

        let updated = service
            .update(
                &id,
                BookingChanges {
                    purpose: Some(BookingPurpose::parse("Retro").expect("purpose")),
                    ..BookingChanges::default()
                },
            )
            .await
            .expect("booking updated");

        let expected = BookingPurpose::parse("Retro").expect("purpose");
        assert_eq!(updated.purpose(), expected.as_ref());
        assert_eq!(updated.slot().start(), start);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_missing_booking_is_not_found() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_delete()
            .returning(|_| Err(BookingPersistenceError::not_found()));
        let service = service(bookings, rooms_holding(None), users_holding(None));

        let error = service
            .delete(&BookingId::random())
            .await
            .expect_err("missing booking");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Booking not found");
    }
}
