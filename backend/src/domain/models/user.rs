//! Domain model for a user account.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Opaque credential string; compared verbatim at login
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Generate a unique user ID.
    /// Format: user-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("user-{}-{}", timestamp_ms, super::random_suffix(4))
    }
}
