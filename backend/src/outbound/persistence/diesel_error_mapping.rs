//! Shared classification of pool and Diesel failures.
//!
//! Each repository converts a [`DbFailure`] into its own port error so the
//! connection/query/duplicate split stays consistent across adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse failure categories shared by all repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The database could not be reached or dropped the connection.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// Any other database or query-builder failure.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_failure(error: PoolError) -> DbFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DbFailure::Connection(message)
        }
    }
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn diesel_failure(error: DieselError) -> DbFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DbFailure::Query("referenced record does not exist".to_owned())
        }
        _ => DbFailure::Query("database error".to_owned()),
    }
}

/// Generate the `map_pool_error` / `map_diesel_error` pair for a port error
/// type whose variants carry `connection` and `query` constructors.
///
/// The optional third argument handles [`DbFailure::UniqueViolation`]; when
/// omitted, unique violations are reported as query errors.
macro_rules! port_error_mapping {
    ($error:ty) => {
        port_error_mapping!($error, |_constraint: Option<String>| {
            <$error>::query("unique constraint violated")
        });
    };
    ($error:ty, $on_unique:expr) => {
        fn map_failure(failure: $crate::outbound::persistence::diesel_error_mapping::DbFailure) -> $error {
            use $crate::outbound::persistence::diesel_error_mapping::DbFailure;
            match failure {
                DbFailure::Connection(message) => <$error>::connection(message),
                DbFailure::UniqueViolation { constraint } => ($on_unique)(constraint),
                DbFailure::Query(message) => <$error>::query(message),
            }
        }

        fn map_pool_error(error: $crate::outbound::persistence::pool::PoolError) -> $error {
            map_failure($crate::outbound::persistence::diesel_error_mapping::pool_failure(error))
        }

        fn map_diesel_error(error: diesel::result::Error) -> $error {
            map_failure($crate::outbound::persistence::diesel_error_mapping::diesel_failure(error))
        }
    };
}

pub(crate) use port_error_mapping;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        assert_eq!(
            pool_failure(PoolError::checkout("timed out")),
            DbFailure::Connection("timed out".to_owned())
        );
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::RollbackTransaction)]
    fn other_errors_are_query_failures(#[case] error: DieselError) {
        assert!(matches!(diesel_failure(error), DbFailure::Query(_)));
    }
}
