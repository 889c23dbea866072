//! Custom error types for the common library
//!
//! This module defines the database-level error types shared by every
//! Staffline service.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database setup and upkeep
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while establishing the connection pool
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred while applying schema migrations
    #[error("Database migration error: {0}")]
    Migration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
