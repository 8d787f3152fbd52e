//! Diesel repositories against embedded PostgreSQL.
//!
//! Opt-in: run with `RUN_PG_EMBEDDED=1 cargo test -- --ignored`. The suite
//! applies the embedded migrations to a fresh database, then drives the
//! repositories through the domain services so constraint mapping is checked
//! end to end.

mod support;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use room_booker::domain::ports::{BookingsCommand, BookingsQuery, RoomsCommand, UsersCommand};
use room_booker::domain::{
    BookingChanges, BookingFilter, BookingService, Capacity, EmailAddress, ErrorCode, NewBooking,
    NewRoom, NewUser, PageRequest, PlainPassword, RoomName, RoomService, TimeSlot, UserChanges,
    UserService, Username,
};
use room_booker::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselRoomRepository, DieselUserRepository, PoolConfig,
    run_migrations,
};
use room_booker::outbound::security::Argon2PasswordHasher;
use tokio::runtime::Runtime;

use support::{create_database, embedded_postgres_enabled, handle_cluster_setup_failure};

type Users = UserService<DieselUserRepository, Argon2PasswordHasher>;
type Bookings = BookingService<DieselBookingRepository, DieselRoomRepository, DieselUserRepository>;

struct Services {
    users: Users,
    rooms: RoomService<DieselRoomRepository>,
    bookings: Bookings,
}

fn services(pool: &DbPool) -> Services {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let rooms = Arc::new(DieselRoomRepository::new(pool.clone()));
    let bookings = Arc::new(DieselBookingRepository::new(pool.clone()));
    Services {
        users: UserService::new(users.clone(), Arc::new(Argon2PasswordHasher)),
        rooms: RoomService::new(rooms.clone()),
        bookings: BookingService::new(bookings, rooms, users),
    }
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        username: Username::new(name).expect("valid username"),
        email: EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
        password: PlainPassword::new("correct horse battery").expect("valid password"),
    }
}

fn slot(start_hour: u32, end_hour: u32) -> TimeSlot {
    TimeSlot::new(
        Utc.with_ymd_and_hms(2026, 3, 2, start_hour, 0, 0).single().expect("start"),
        Utc.with_ymd_and_hms(2026, 3, 2, end_hour, 0, 0).single().expect("end"),
    )
    .expect("ordered slot")
}

async fn exercise(services: Services) {
    let ada = services.users.create(new_user("ada")).await.expect("create ada");
    let grace = services.users.create(new_user("grace")).await.expect("create grace");

    let duplicate = services
        .users
        .create(new_user("ada"))
        .await
        .expect_err("duplicate username");
    assert_eq!(duplicate.code(), ErrorCode::Conflict);

    let taken_email = services
        .users
        .update(
            grace.id(),
            UserChanges {
                email: Some(EmailAddress::new("ada@example.com").expect("valid email")),
                ..UserChanges::default()
            },
        )
        .await
        .expect_err("email already used");
    assert_eq!(taken_email.code(), ErrorCode::Conflict);

    let room = services
        .rooms
        .create(NewRoom {
            name: RoomName::new("Boardroom").expect("valid name"),
            capacity: Capacity::new(8).expect("valid capacity"),
            location: None,
        })
        .await
        .expect("create room");

    let booking = services
        .bookings
        .create(NewBooking {
            room_id: *room.id(),
            user_id: *ada.id(),
            slot: slot(9, 10),
            purpose: None,
            required_capacity: None,
        })
        .await
        .expect("create booking");

    // Referenced rows are protected by RESTRICT foreign keys.
    let err = services.rooms.delete(room.id()).await.expect_err("room in use");
    assert_eq!(err.code(), ErrorCode::Conflict);
    let err = services.users.delete(ada.id()).await.expect_err("user in use");
    assert_eq!(err.code(), ErrorCode::Conflict);

    let moved = services
        .bookings
        .update(
            booking.id(),
            BookingChanges {
                user_id: Some(*grace.id()),
                end: Some(slot(9, 11).end()),
                ..BookingChanges::default()
            },
        )
        .await
        .expect("update booking");
    assert_eq!(moved.user_id(), grace.id());
    assert_eq!(moved.slot(), slot(9, 11));

    let listed = services
        .bookings
        .list(
            BookingFilter {
                room_id: Some(*room.id()),
                user_id: None,
            },
            PageRequest::default(),
        )
        .await
        .expect("list bookings");
    assert_eq!(listed, vec![moved]);

    services.bookings.delete(booking.id()).await.expect("delete booking");
    services.rooms.delete(room.id()).await.expect("delete room");
    services.users.delete(ada.id()).await.expect("delete ada");

    let err = services.users.delete(ada.id()).await.expect_err("already gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn diesel_repositories_enforce_constraints() {
    if !embedded_postgres_enabled() {
        eprintln!("SKIP-TEST-CLUSTER: set RUN_PG_EMBEDDED=1 to run");
        return;
    }

    let cluster = match support::pg_embed::test_cluster() {
        Ok(cluster) => cluster,
        Err(reason) => {
            handle_cluster_setup_failure::<()>(reason);
            return;
        }
    };
    let connection = cluster.connection();
    if let Err(reason) = create_database(&connection.database_url("postgres"), "room_booker") {
        handle_cluster_setup_failure::<()>(reason);
        return;
    }
    let database_url = connection.database_url("room_booker");

    let runtime = Runtime::new().expect("tokio runtime");
    runtime.block_on(async {
        run_migrations(&database_url).await.expect("migrations apply");
        // A second run finds nothing pending.
        run_migrations(&database_url).await.expect("migrations are idempotent");

        let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(2))
            .await
            .expect("pool builds");
        exercise(services(&pool)).await;
    });
}
