//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! Referential integrity is enforced by the `bookings_room_id_fkey` and
//! `bookings_user_id_fkey` constraints. A violation on write means the room
//! or user vanished after the service checked for it and maps to
//! [`BookingPersistenceError::MissingReference`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BookingPersistenceError, BookingReference, BookingRepository};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingPurpose, BookingValidationError, PageRequest,
    RoomId, TimeSlot, UserId,
};

use super::diesel_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{BookingRow, BookingUpdate, NewBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::bookings;

const ROOM_FKEY: &str = "bookings_room_id_fkey";
const USER_FKEY: &str = "bookings_user_id_fkey";

/// Diesel-backed implementation of the [`BookingRepository`] port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingPersistenceError {
    map_basic_pool_error(error, BookingPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingPersistenceError {
    match constraint_violation(&error) {
        Some(violation @ ConstraintViolation::ForeignKey(_)) if violation.is(ROOM_FKEY) => {
            BookingPersistenceError::missing_reference(BookingReference::Room)
        }
        Some(violation @ ConstraintViolation::ForeignKey(_)) if violation.is(USER_FKEY) => {
            BookingPersistenceError::missing_reference(BookingReference::User)
        }
        Some(ConstraintViolation::ForeignKey(name)) => {
            warn!(
                constraint = name,
                "unrecognised foreign key violation on bookings"
            );
            BookingPersistenceError::query("foreign key violation")
        }
        _ => map_basic_diesel_error(
            &error,
            BookingPersistenceError::query,
            BookingPersistenceError::connection,
        ),
    }
}

fn row_to_booking(row: BookingRow) -> Result<Booking, BookingPersistenceError> {
    let invalid = |err: BookingValidationError| {
        warn!(booking_id = %row.id, error = %err, "stored booking row failed validation");
        BookingPersistenceError::query(format!("stored booking is invalid: {err}"))
    };
    let slot = TimeSlot::new(row.start_time, row.end_time).map_err(invalid)?;
    let purpose = row
        .purpose
        .as_deref()
        .map(BookingPurpose::parse)
        .transpose()
        .map_err(invalid)?
        .flatten();
    Ok(Booking::new(
        BookingId::from_uuid(row.id),
        RoomId::from_uuid(row.room_id),
        UserId::from_uuid(row.user_id),
        slot,
        purpose,
    ))
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBookingRow {
            id: *booking.id().as_uuid(),
            room_id: *booking.room_id().as_uuid(),
            user_id: *booking.user_id().as_uuid(),
            start_time: booking.slot().start(),
            end_time: booking.slot().end(),
            purpose: booking.purpose().map(AsRef::as_ref),
        };

        diesel::insert_into(bookings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = BookingUpdate {
            room_id: *booking.room_id().as_uuid(),
            user_id: *booking.user_id().as_uuid(),
            start_time: booking.slot().start(),
            end_time: booking.slot().end(),
            purpose: booking.purpose().map(AsRef::as_ref),
        };

        let affected = diesel::update(bookings::table.find(*booking.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Err(BookingPersistenceError::not_found());
        }
        Ok(())
    }

    async fn delete(&self, id: &BookingId) -> Result<(), BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(bookings::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Err(BookingPersistenceError::not_found());
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookingRow> = bookings::table
            .find(*id.as_uuid())
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_booking).transpose()
    }

    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = bookings::table
            .select(BookingRow::as_select())
            .into_boxed();
        if let Some(room_id) = filter.room_id {
            query = query.filter(bookings::room_id.eq(*room_id.as_uuid()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(bookings::user_id.eq(*user_id.as_uuid()));
        }

        let rows: Vec<BookingRow> = query
            .order((bookings::start_time.asc(), bookings::id.asc()))
            .offset(i64::from(page.offset()))
            .limit(i64::from(page.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_booking).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::persistence::diesel_error_mapping::test_support::violation;
    use chrono::{Duration, Utc};
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case(ROOM_FKEY, BookingReference::Room)]
    #[case(USER_FKEY, BookingReference::User)]
    fn foreign_key_violations_map_to_missing_reference(
        #[case] constraint: &'static str,
        #[case] entity: BookingReference,
    ) {
        let error = violation(DatabaseErrorKind::ForeignKeyViolation, constraint);
        assert_eq!(
            map_diesel_error(error),
            BookingPersistenceError::missing_reference(entity)
        );
    }

    #[rstest]
    fn check_violation_is_query_error() {
        let error = violation(DatabaseErrorKind::CheckViolation, "bookings_time_order_check");
        assert!(matches!(
            map_diesel_error(error),
            BookingPersistenceError::Query { .. }
        ));
    }

    #[rstest]
    fn row_conversion_rejects_inverted_slot() {
        let now = Utc::now();
        let row = BookingRow {
            id: uuid::Uuid::new_v4(),
            room_id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            start_time: now,
            end_time: now - Duration::minutes(5),
            purpose: None,
        };
        assert!(matches!(
            row_to_booking(row),
            Err(BookingPersistenceError::Query { .. })
        ));
    }
}
