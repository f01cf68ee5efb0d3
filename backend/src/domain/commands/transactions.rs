use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::models::transaction::{Transaction, TransactionType};

#[derive(Debug, Clone)]
pub struct CreateTransactionCommand {
    pub category_id: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    /// Uses the current time when not provided
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionCommand {
    pub transaction_id: String,
    pub category_id: Option<String>,
    pub amount: Option<f64>,
    pub transaction_type: Option<TransactionType>,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionListQuery {
    pub after: Option<String>,
    pub limit: Option<u32>,
    pub category_id: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct TransactionListResult {
    pub transactions: Vec<Transaction>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone)]
pub struct PaginationInfo {
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteTransactionsCommand {
    pub transaction_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteTransactionsResult {
    pub deleted_count: usize,
    pub success_message: String,
    pub not_found_ids: Vec<String>,
}
