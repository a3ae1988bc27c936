// sqlx::Error -> AppError
// (orphan rules rule out `impl From<sqlx::Error> for AppError` here)

use jobboard_core::error::AppError;

/// Map a sqlx error, keeping "store unreachable" distinct from query failures
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Conflict(format!(
                        "Unique constraint violation: {}",
                        db_err.message()
                    )),
                    "787" | "3850" => AppError::Database(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    // SQLITE_BUSY / SQLITE_LOCKED
                    "5" | "6" | "517" => AppError::StoreUnavailable(format!(
                        "Database locked: {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
            AppError::StoreUnavailable(err.to_string())
        }
        sqlx::Error::Io(io) => AppError::StoreUnavailable(format!("I/O error: {}", io)),
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_retryable() {
        assert!(map_sqlx_error(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(map_sqlx_error(sqlx::Error::PoolClosed).is_retryable());
    }

    #[test]
    fn test_row_not_found_is_not_retryable() {
        assert!(!map_sqlx_error(sqlx::Error::RowNotFound).is_retryable());
    }
}
