//! Local relational backend built on sqlx + SQLite.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
