//! Conversions from external infrastructure errors into domain errors.

use haven_domain::HavenError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub HavenError);

impl From<InfraError> for HavenError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<HavenError> for InfraError {
    fn from(value: HavenError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoHavenError {
    fn into_haven(self) -> HavenError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → HavenError */
/* -------------------------------------------------------------------------- */

impl IntoHavenError for SqlError {
    fn into_haven(self) -> HavenError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => HavenError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        HavenError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        HavenError::Conflict("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        HavenError::Conflict("foreign key constraint violation".into())
                    }
                    _ => HavenError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => HavenError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                HavenError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                HavenError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => HavenError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                HavenError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => {
                HavenError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            RE::InvalidQuery => HavenError::Database("invalid SQL query".into()),
            other => HavenError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_haven())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → HavenError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(HavenError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → HavenError */
/* -------------------------------------------------------------------------- */

impl From<tokio::task::JoinError> for InfraError {
    fn from(value: tokio::task::JoinError) -> Self {
        let message = if value.is_cancelled() {
            "blocking database task cancelled".to_string()
        } else {
            format!("blocking database task failed: {value}")
        };
        InfraError(HavenError::Internal(message))
    }
}
