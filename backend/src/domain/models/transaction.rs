//! Domain model for a transaction.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Canonical lowercase form used in storage columns and documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn from_str(value: &str) -> Option<TransactionType> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    /// Always positive; direction comes from `transaction_type`
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub date: DateTime<Utc>,
    pub note: Option<String>,
}

impl Transaction {
    /// Generate a unique transaction ID based on type and timestamp.
    /// Format: <in|ex>-<timestamp_ms>-<random_suffix>
    /// Example: ex-1625846400123-af3c
    pub fn generate_id(transaction_type: TransactionType, timestamp_ms: u64) -> String {
        let prefix = match transaction_type {
            TransactionType::Income => "in",
            TransactionType::Expense => "ex",
        };
        format!("{}-{}-{}", prefix, timestamp_ms, super::random_suffix(4))
    }

    /// Parse a transaction ID to extract its type prefix and timestamp.
    pub fn parse_id(id: &str) -> Result<(&str, u64), String> {
        let parts: Vec<&str> = id.split('-').collect();
        if parts.len() != 3 {
            return Err(format!("Invalid transaction ID format: {}", id));
        }
        let prefix = parts[0];
        if prefix != "in" && prefix != "ex" {
            return Err(format!("Invalid transaction ID prefix: {}", prefix));
        }
        let timestamp = parts[1]
            .parse::<u64>()
            .map_err(|_| format!("Invalid timestamp in ID: {}", parts[1]))?;
        Ok((prefix, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_uses_type_prefix() {
        let income = Transaction::generate_id(TransactionType::Income, 1625846400123);
        assert!(income.starts_with("in-1625846400123-"));

        let expense = Transaction::generate_id(TransactionType::Expense, 1625846400123);
        assert!(expense.starts_with("ex-1625846400123-"));
    }

    #[test]
    fn test_parse_id() {
        let (prefix, ts) = Transaction::parse_id("ex-1625846400123-af3c").unwrap();
        assert_eq!(prefix, "ex");
        assert_eq!(ts, 1625846400123);

        assert!(Transaction::parse_id("ex-1625846400123").is_err());
        assert!(Transaction::parse_id("transfer-123-abcd").is_err());
        assert!(Transaction::parse_id("in-notanumber-abcd").is_err());
    }
}
