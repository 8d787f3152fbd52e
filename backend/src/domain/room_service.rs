//! Room domain service implementing [`RoomsCommand`] and [`RoomsQuery`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{RoomPersistenceError, RoomRepository, RoomsCommand, RoomsQuery};
use crate::domain::{Error, NewRoom, PageRequest, Room, RoomChanges, RoomId};

pub(crate) fn room_not_found(id: &RoomId) -> Error {
    Error::not_found("Room not found").with_details(json!({
        "id": id.to_string(),
        "code": "room_not_found",
    }))
}

fn room_has_bookings(id: &RoomId) -> Error {
    Error::conflict("Room has bookings; delete them first").with_details(json!({
        "id": id.to_string(),
        "code": "room_has_bookings",
    }))
}

pub(crate) fn map_room_persistence_error(error: RoomPersistenceError) -> Error {
    match error {
        RoomPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("room repository unavailable: {message}"))
        }
        RoomPersistenceError::Query { message } => {
            Error::internal(format!("room repository error: {message}"))
        }
        RoomPersistenceError::NotFound => Error::not_found("Room not found"),
        RoomPersistenceError::StillReferenced => Error::conflict("Room has bookings")
            .with_details(json!({ "code": "room_has_bookings" })),
    }
}

/// Room service implementing the room driving ports.
#[derive(Clone)]
pub struct RoomService<R> {
    rooms: Arc<R>,
}

impl<R> RoomService<R> {
    /// Create a new service backed by `rooms`.
    pub fn new(rooms: Arc<R>) -> Self {
        Self { rooms }
    }
}

impl<R: RoomRepository> RoomService<R> {
    async fn require(&self, id: &RoomId) -> Result<Room, Error> {
        self.rooms
            .find_by_id(id)
            .await
            .map_err(map_room_persistence_error)?
            .ok_or_else(|| room_not_found(id))
    }
}

#[async_trait]
impl<R: RoomRepository> RoomsCommand for RoomService<R> {
    async fn create(&self, request: NewRoom) -> Result<Room, Error> {
        let NewRoom {
            name,
            capacity,
            location,
        } = request;
        let room = Room::new(RoomId::random(), name, capacity, location);
        self.rooms
            .insert(&room)
            .await
            .map_err(map_room_persistence_error)?;
        info!(room_id = %room.id(), "room created");
        Ok(room)
    }

    async fn update(&self, id: &RoomId, changes: RoomChanges) -> Result<Room, Error> {
        let updated = self.require(id).await?.apply(changes);
        self.rooms
            .update(&updated)
            .await
            .map_err(map_room_persistence_error)?;
        Ok(updated)
    }

    async fn delete(&self, id: &RoomId) -> Result<(), Error> {
        self.require(id).await?;
        let referenced = self
            .rooms
            .has_bookings(id)
            .await
            .map_err(map_room_persistence_error)?;
        if referenced {
            return Err(room_has_bookings(id));
        }
        self.rooms.delete(id).await.map_err(|error| match error {
            RoomPersistenceError::StillReferenced => room_has_bookings(id),
            other => map_room_persistence_error(other),
        })?;
        info!(room_id = %id, "room deleted");
        Ok(())
    }
}

#[async_trait]
impl<R: RoomRepository> RoomsQuery for RoomService<R> {
    async fn list(&self, page: PageRequest) -> Result<Vec<Room>, Error> {
        self.rooms
            .list(page)
            .await
            .map_err(map_room_persistence_error)
    }

    async fn get(&self, id: &RoomId) -> Result<Room, Error> {
        self.require(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockRoomRepository;
    use crate::domain::{Capacity, ErrorCode, RoomLocation, RoomName};
    use rstest::{fixture, rstest};

    #[fixture]
    fn room() -> Room {
        Room::new(
            RoomId::random(),
            RoomName::new("Boardroom").expect("name"),
            Capacity::new(12).expect("capacity"),
            RoomLocation::parse("Floor 3").expect("location"),
        )
    }

    fn repo_holding(room: &Room) -> MockRoomRepository {
        let stored = room.clone();
        let mut repo = MockRoomRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_identifier_and_persists() {
        let mut repo = MockRoomRepository::new();
        repo.expect_insert().times(1).returning(|_| Ok(()));
        let service = RoomService::new(Arc::new(repo));

        let room = service
            .create(NewRoom {
                name: RoomName::new("Atrium").expect("name"),
                capacity: Capacity::new(40).expect("capacity"),
                location: None,
            })
            .await
            .expect("room created");

        assert_eq!(room.name().as_ref(), "Atrium");
        assert_eq!(room.capacity().get(), 40);
    }

    #[rstest]
    #[tokio::test]
    async fn update_keeps_unspecified_fields(room: Room) {
        let mut repo = repo_holding(&room);
        repo.expect_update().times(1).returning(|_| Ok(()));
        let service = RoomService::new(Arc::new(repo));

        let updated = service
            .update(
                room.id(),
                RoomChanges {
                    capacity: Some(Capacity::new(20).expect("capacity")),
                    ..RoomChanges::default()
                },
            )
            .await
            .expect("room updated");

        assert_eq!(updated.capacity().get(), 20);
        assert_eq!(updated.name(), room.name());
        assert_eq!(updated.location(), room.location());
    }

    #[rstest]
    #[tokio::test]
    async fn get_missing_room_is_not_found() {
        let mut repo = MockRoomRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let service = RoomService::new(Arc::new(repo));

        let error = service
            .get(&RoomId::random())
            .await
            .expect_err("missing room");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Room not found");
    }

    #[rstest]
    #[case(true, Some(ErrorCode::Conflict))]
    #[case(false, None)]
    #[tokio::test]
    async fn delete_is_restricted_by_bookings(
        room: Room,
        #[case] has_bookings: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut repo = repo_holding(&room);
        repo.expect_has_bookings()
            .returning(move |_| Ok(has_bookings));
        repo.expect_delete()
            .times(usize::from(!has_bookings))
            .returning(|_| Ok(()));
        let service = RoomService::new(Arc::new(repo));

        let result = service.delete(room.id()).await;

        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_racing_a_new_booking_is_conflict(room: Room) {
        let mut repo = repo_holding(&room);
        repo.expect_has_bookings().returning(|_| Ok(false));
        repo.expect_delete()
            .times(1)
            .returning(|_| Err(RoomPersistenceError::still_referenced()));
        let service = RoomService::new(Arc::new(repo));

        let error = service
            .delete(room.id())
            .await
            .expect_err("store rejects the delete");

        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(
            error.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
            Some("room_has_bookings")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_map_to_unavailable() {
        let mut repo = MockRoomRepository::new();
        repo.expect_list()
            .returning(|_| Err(RoomPersistenceError::connection("refused")));
        let service = RoomService::new(Arc::new(repo));

        let error = service
            .list(PageRequest::default())
            .await
            .expect_err("connection failure");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
