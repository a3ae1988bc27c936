//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jobboard_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use serde_json::json;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const UNAUTHENTICATED: i32 = 4010;
    pub const FORBIDDEN: i32 = 4030;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const STORE_UNAVAILABLE: i32 = 5030;
}

/// Failures starting the server (request errors go through [`to_rpc_error`])
#[derive(Debug, thiserror::Error)]
pub enum RpcServerError {
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("failed to register method: {0}")]
    Register(String),
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(errors) => ErrorObjectOwned::owned(
            code::VALIDATION_ERROR,
            format!("Validation failed: {}", errors),
            Some(json!({ "fields": errors })),
        ),
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::Conflict(msg) => ErrorObjectOwned::owned(code::CONFLICT, msg, None::<()>),
        AppError::InvalidState(msg) => ErrorObjectOwned::owned(code::CONFLICT, msg, None::<()>),
        AppError::Domain(e) => ErrorObjectOwned::owned(code::CONFLICT, e.to_string(), None::<()>),
        AppError::Unauthenticated => ErrorObjectOwned::owned(
            code::UNAUTHENTICATED,
            "Authentication required",
            None::<()>,
        ),
        AppError::Forbidden(msg) => ErrorObjectOwned::owned(code::FORBIDDEN, msg, None::<()>),
        AppError::StoreUnavailable(msg) => ErrorObjectOwned::owned(
            code::STORE_UNAVAILABLE,
            format!("Store unavailable: {}", msg),
            Some(json!({ "retryable": true })),
        ),
        AppError::Database(msg) => ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>),
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}
