//! Domain model for a budget.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub name: String,
    pub min_goal: f64,
    pub max_goal: f64,
    /// Inclusive start of the budget window
    pub start_date: NaiveDate,
    /// Inclusive end of the budget window
    pub end_date: NaiveDate,
}

impl Budget {
    /// Generate a unique budget ID.
    /// Format: budget-<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("budget-{}-{}", timestamp_ms, super::random_suffix(4))
    }

    /// Whether a calendar date falls inside this budget's window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// A budget together with its derived spending total.
///
/// `current_amount` is recomputed on every read by summing matching expense
/// transactions; it is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub current_amount: f64,
}
