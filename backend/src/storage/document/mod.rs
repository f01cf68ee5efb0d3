//! Document-collection backend.
//!
//! Mirrors the four entity collections as per-user scoped JSON documents on
//! disk, the way a cloud document store lays out its data. Every successful
//! write publishes a [`connection::ChangeEvent`] on a broadcast channel so
//! listeners can react to changes in realtime.

pub mod connection;
pub mod repositories;

pub use connection::{ChangeEvent, ChangeKind, Collection, DocumentConnection};
