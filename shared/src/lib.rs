use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered user of the finance tracker.
///
/// The credential is never included here; this is the shape returned to
/// clients after registration or login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// RFC 3339 timestamp of when the account was created
    pub created_at: String,
}

/// Type of transaction for rendering and business logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (salary, gifts, refunds)
    Income,
    /// Money going out (purchases, bills)
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<TransactionType> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense event belonging to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// ID of the user this transaction belongs to
    pub user_id: String,
    /// ID of the category the transaction is filed under
    pub category_id: String,
    /// Transaction amount, always positive; direction comes from the type
    pub amount: f64,
    pub transaction_type: TransactionType,
    /// RFC 3339 timestamp of when the transaction occurred
    pub date: String,
    /// Optional free-form note (max 256 characters)
    pub note: Option<String>,
}

/// A user-defined label for classifying transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Display color as a packed ARGB integer
    pub color: i64,
    /// Symbolic icon name chosen by the user
    pub icon: String,
}

/// A spending goal for a category over a date range.
///
/// `current_amount` is derived on read by summing matching expense
/// transactions; it is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub name: String,
    pub min_goal: f64,
    pub max_goal: f64,
    /// ISO 8601 date (YYYY-MM-DD), inclusive
    pub start_date: String,
    /// ISO 8601 date (YYYY-MM-DD), inclusive
    pub end_date: String,
    /// Sum of expense transactions in range; 0.0 when nothing matches
    pub current_amount: f64,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub user: User,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response from a login attempt. `user` is `None` when the credentials
/// did not match; there is no further error detail by design.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogoutResponse {
    pub success_message: String,
}

/// The currently logged-in user, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveUserResponse {
    pub active_user: Option<User>,
}

/// Result of checking a candidate password against the account policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PasswordValidation {
    pub is_valid: bool,
    pub violations: Vec<PasswordRuleViolation>,
}

/// Specific password policy violations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PasswordRuleViolation {
    /// Fewer than 8 characters; carries the actual length
    TooShort(usize),
    MissingUppercase,
    MissingDigit,
    MissingSpecialCharacter,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: i64,
    pub icon: String,
}

/// Request for updating an existing category. Absent fields are unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub color: Option<i64>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryResponse {
    pub category: Category,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTransactionRequest {
    pub category_id: String,
    /// Positive amount; the type decides income vs expense
    pub amount: f64,
    pub transaction_type: TransactionType,
    /// Optional date override (RFC 3339) - uses current time if not provided
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Request for updating an existing transaction. Absent fields are unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateTransactionRequest {
    pub category_id: Option<String>,
    pub amount: Option<f64>,
    pub transaction_type: Option<TransactionType>,
    pub date: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListRequest {
    /// Cursor for pagination - transaction ID to start after
    pub after: Option<String>,
    /// Maximum number of transactions to return
    pub limit: Option<u32>,
    /// Restrict to a single category
    pub category_id: Option<String>,
    /// Restrict to income or expense rows
    pub transaction_type: Option<TransactionType>,
    /// Start date for filtering (YYYY-MM-DD, inclusive)
    pub start_date: Option<String>,
    /// End date for filtering (YYYY-MM-DD, inclusive)
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionResponse {
    pub transaction: Transaction,
    pub success_message: String,
}

/// Request for deleting multiple transactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteTransactionsRequest {
    pub transaction_ids: Vec<String>,
}

/// Response after deleting transactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteTransactionsResponse {
    pub deleted_count: usize,
    pub success_message: String,
    pub not_found_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateBudgetRequest {
    pub category_id: String,
    pub name: String,
    pub min_goal: f64,
    pub max_goal: f64,
    pub start_date: String,
    pub end_date: String,
}

/// Request for updating an existing budget. Absent fields are unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateBudgetRequest {
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub min_goal: Option<f64>,
    pub max_goal: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetResponse {
    pub budget: Budget,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetListResponse {
    pub budgets: Vec<Budget>,
}

/// Configuration for transaction form limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionLimits {
    pub max_note_length: usize,
    pub min_amount: f64,
    pub max_amount: f64,
    pub currency_symbol: String,
}

impl Default for TransactionLimits {
    fn default() -> Self {
        Self {
            max_note_length: 256,
            min_amount: 0.01,
            max_amount: 1_000_000.0,
            currency_symbol: "$".to_string(),
        }
    }
}
