//! Domain models for the finance tracker.
//!
//! These are the chrono-typed structs the services and repositories work
//! with. The string-dated DTOs live in the `shared` crate and are produced
//! by the mappers in `io/rest/mappers`.

pub mod budget;
pub mod category;
pub mod transaction;
pub mod user;

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, used as the timestamp part of IDs.
pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

/// Generate a random hex suffix for entity IDs.
pub(crate) fn random_suffix(len: usize) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos();
    format!("{:0width$x}", now % (16_u128.pow(len as u32)), width = len)
}
