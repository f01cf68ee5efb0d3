//! Domain model for a transaction category.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Packed ARGB display color
    pub color: i64,
    /// Symbolic icon name
    pub icon: String,
}

impl Category {
    /// Generate a unique category ID.
    /// Format: cat-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("cat-{}-{}", timestamp_ms, super::random_suffix(4))
    }
}
