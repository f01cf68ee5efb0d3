//! # Storage Layer
//!
//! Two interchangeable persistence backends sit behind the traits in
//! [`traits`]:
//! - [`sqlite`]: a local relational store (sqlx + SQLite)
//! - [`document`]: per-user JSON document collections on disk with a
//!   realtime change feed
//!
//! The domain layer only ever sees `Arc<dyn ...Store>` trait objects, so the
//! backend can be swapped at startup without touching business logic.

pub mod document;
pub mod sqlite;
pub mod traits;

use thiserror::Error;

/// Errors the repositories distinguish beyond plain I/O failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StorageError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
