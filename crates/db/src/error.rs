//! Translation of sqlx errors into the domain taxonomy.
//!
//! Every repository maps driver errors through [`map_db_err`] before
//! returning, so handlers only ever see [`CoreError`] variants.

use lingopod_core::error::CoreError;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL error code for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Classify a sqlx error into a [`CoreError`], logging the raw error.
///
/// - Unique violations become `Conflict` naming the constraint.
/// - Foreign key violations become `InvalidArgument` (the referenced
///   entity does not exist).
/// - Everything else becomes `Internal` carrying `context`.
pub fn map_db_err(context: &'static str, err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                tracing::warn!(error = %db_err, constraint, context, "Unique violation");
                return CoreError::Conflict(format!(
                    "duplicate value violates unique constraint {constraint}"
                ));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                tracing::warn!(error = %db_err, constraint, context, "Foreign key violation");
                return CoreError::InvalidArgument(format!(
                    "referenced entity does not exist ({constraint})"
                ));
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, context, "Database error");
    CoreError::Internal(format!("{context}: {err}"))
}
