//! PostgreSQL-backed `RoomRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{RoomPersistenceError, RoomRepository};
use crate::domain::{
    Capacity, PageRequest, Room, RoomId, RoomLocation, RoomName, RoomValidationError,
};

use super::diesel_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewRoomRow, RoomRow, RoomUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, rooms};

/// Diesel-backed implementation of the [`RoomRepository`] port.
#[derive(Clone)]
pub struct DieselRoomRepository {
    pool: DbPool,
}

impl DieselRoomRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RoomPersistenceError {
    map_basic_pool_error(error, RoomPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RoomPersistenceError {
    if let Some(ConstraintViolation::ForeignKey(_)) = constraint_violation(&error) {
        return RoomPersistenceError::still_referenced();
    }
    map_basic_diesel_error(
        &error,
        RoomPersistenceError::query,
        RoomPersistenceError::connection,
    )
}

fn row_to_room(row: RoomRow) -> Result<Room, RoomPersistenceError> {
    let invalid = |err: RoomValidationError| {
        warn!(room_id = %row.id, error = %err, "stored room row failed validation");
        RoomPersistenceError::query(format!("stored room is invalid: {err}"))
    };
    let name = RoomName::new(&row.name).map_err(invalid)?;
    let capacity = Capacity::new(i64::from(row.capacity)).map_err(invalid)?;
    let location = row
        .location
        .as_deref()
        .map(RoomLocation::parse)
        .transpose()
        .map_err(invalid)?
        .flatten();
    Ok(Room::new(RoomId::from_uuid(row.id), name, capacity, location))
}

#[async_trait]
impl RoomRepository for DieselRoomRepository {
    async fn insert(&self, room: &Room) -> Result<(), RoomPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRoomRow {
            id: *room.id().as_uuid(),
            name: room.name().as_ref(),
            capacity: room.capacity().get(),
            location: room.location().map(AsRef::as_ref),
        };

        diesel::insert_into(rooms::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, room: &Room) -> Result<(), RoomPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = RoomUpdate {
            name: room.name().as_ref(),
            capacity: room.capacity().get(),
            location: room.location().map(AsRef::as_ref),
        };

        let affected = diesel::update(rooms::table.find(*room.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Err(RoomPersistenceError::not_found());
        }
        Ok(())
    }

    async fn delete(&self, id: &RoomId) -> Result<(), RoomPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(rooms::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Err(RoomPersistenceError::not_found());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &RoomId) -> Result<Option<Room>, RoomPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RoomRow> = rooms::table
            .find(*id.as_uuid())
            .select(RoomRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_room).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Room>, RoomPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RoomRow> = rooms::table
            .order((rooms::created_at.asc(), rooms::id.asc()))
            .offset(i64::from(page.offset()))
            .limit(i64::from(page.limit()))
            .select(RoomRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_room).collect()
    }

    async fn has_bookings(&self, id: &RoomId) -> Result<bool, RoomPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            bookings::table.filter(bookings::room_id.eq(id.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
