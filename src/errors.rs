use sea_orm::{DbErr, SqlErr};

/// Error type shared by repositories and services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rejected argument to a domain operation, e.g. a negative quantity adjustment.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ServiceError::Conflict(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                ServiceError::Conflict(format!("foreign key constraint violated: {}", detail))
            }
            _ => ServiceError::DatabaseError(err),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        ServiceError::NotFound(format!("{} with ID {} not found", entity, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn custom_db_errors_stay_database_errors() {
        let err: ServiceError = DbErr::Custom("connection reset".into()).into();
        assert_matches!(err, ServiceError::DatabaseError(DbErr::Custom(_)));
    }

    #[test]
    fn record_not_found_is_database_error() {
        let err: ServiceError = DbErr::RecordNotFound("orders".into()).into();
        assert_matches!(err, ServiceError::DatabaseError(_));
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = ServiceError::not_found("Order", 42);
        assert_eq!(err.to_string(), "Not found: Order with ID 42 not found");
    }

    #[test]
    fn validation_errors_convert() {
        let err: ServiceError = validator::ValidationErrors::new().into();
        assert_matches!(err, ServiceError::ValidationError(_));
    }
}
