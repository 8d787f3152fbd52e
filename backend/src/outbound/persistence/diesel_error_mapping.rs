//! Shared Diesel error mapping for the repository adapters.
//!
//! Each repository owns the mapping onto its port error, but the
//! classification of raw Diesel failures lives here so that logging and
//! constraint detection stay consistent.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Integrity constraint reported by PostgreSQL, with its name when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ConstraintViolation<'a> {
    Unique(Option<&'a str>),
    ForeignKey(Option<&'a str>),
    Check(Option<&'a str>),
}

impl ConstraintViolation<'_> {
    /// Whether the violated constraint carries `name`.
    pub(super) fn is(&self, name: &str) -> bool {
        let constraint = match self {
            Self::Unique(constraint) | Self::ForeignKey(constraint) | Self::Check(constraint) => {
                constraint
            }
        };
        constraint.is_some_and(|constraint| constraint == name)
    }
}

/// Classify integrity violations so repositories can map them to port errors.
pub(super) fn constraint_violation(error: &DieselError) -> Option<ConstraintViolation<'_>> {
    let DieselError::DatabaseError(kind, info) = error else {
        return None;
    };
    let name = info.constraint_name();
    match kind {
        DatabaseErrorKind::UniqueViolation => Some(ConstraintViolation::Unique(name)),
        DatabaseErrorKind::ForeignKeyViolation => Some(ConstraintViolation::ForeignKey(name)),
        DatabaseErrorKind::CheckViolation => Some(ConstraintViolation::Check(name)),
        _ => None,
    }
}

/// Extract the pool failure message for a repository connection error.
pub(super) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map Diesel failures that carry no domain meaning onto query/connection
/// constructors, logging the raw cause at debug level.
pub(super) fn map_basic_diesel_error<E, Q, C>(error: &DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("check constraint violated")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
pub(super) mod test_support {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

    struct ConstraintInfo(&'static str);

    impl DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "constraint violated"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    /// Build a database error reporting `constraint` as violated.
    pub(crate) fn violation(kind: DatabaseErrorKind, constraint: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(ConstraintInfo(constraint)))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::violation;
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn classifies_foreign_key_violations_by_name() {
        let error = violation(DatabaseErrorKind::ForeignKeyViolation, "bookings_room_id_fkey");
        let classified = constraint_violation(&error).expect("constraint violation");
        assert_eq!(
            classified,
            ConstraintViolation::ForeignKey(Some("bookings_room_id_fkey"))
        );
        assert!(classified.is("bookings_room_id_fkey"));
        assert!(!classified.is("bookings_user_id_fkey"));
    }

    #[rstest]
    fn non_database_errors_are_not_constraints() {
        assert!(constraint_violation(&DieselError::NotFound).is_none());
    }

    #[rstest]
    fn closed_connections_map_to_connection_constructor() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new(String::from("server closed the connection")),
        );
        let mapped: Result<(), String> = Err(map_basic_diesel_error(
            &error,
            |message| format!("query: {message}"),
            |message| format!("connection: {message}"),
        ));
        assert_eq!(mapped, Err("connection: database connection error".to_owned()));
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_basic_pool_error(PoolError::build("bad url"), |message| message);
        assert_eq!(mapped, "bad url");
    }
}
