//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    ///
    /// `username` and `email` carry the unique constraints
    /// `users_username_key` and `users_email_key`.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string.
        hashed_password -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookable rooms.
    rooms (id) {
        id -> Uuid,
        name -> Varchar,
        /// Seat count, constrained to be positive.
        capacity -> Int4,
        location -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Room reservations. Foreign keys restrict deletion of referenced rooms
    /// and users; `start_time < end_time` is enforced by a check constraint.
    bookings (id) {
        id -> Uuid,
        room_id -> Uuid,
        user_id -> Uuid,
        start_time -> Timestamptz,
        end_time -> Timestamptz,
        purpose -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(bookings -> rooms (room_id));
diesel::joinable!(bookings -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(bookings, rooms, users);
