//! Error types for the storage layer.
//!
//! Store operations themselves never fail (see [`crate::workout_store`] and
//! [`crate::nutrition_store`]); these errors only come out of opening the
//! durable environment, raw slot I/O and FFI argument parsing.

use thiserror::Error;

/// Errors raised while opening or talking to the durable key-value area.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("LMDB error: {0}")]
    Lmdb(#[from] lmdb::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid date '{0}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
