//! Common library for the Staffline HR platform
//!
//! This crate provides shared functionality used across the Staffline
//! services: database connectivity and the shared database error types.

pub mod database;
pub mod error;
