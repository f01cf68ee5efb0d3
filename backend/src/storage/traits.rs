//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::budget::Budget as DomainBudget;
use crate::domain::models::category::Category as DomainCategory;
use crate::domain::models::transaction::{
    Transaction as DomainTransaction, TransactionType as DomainTransactionType,
};
use crate::domain::models::user::User as DomainUser;

/// Filters and pagination for transaction listing.
///
/// Results are always ordered newest first; `after` is the ID of the last
/// transaction of the previous page.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub category_id: Option<String>,
    pub transaction_type: Option<DomainTransactionType>,
    /// Inclusive calendar-date lower bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive calendar-date upper bound
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub after: Option<String>,
}

/// Trait defining the interface for user storage operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a new user
    async fn store_user(&self, user: &DomainUser) -> Result<()>;

    /// Retrieve a specific user by ID
    async fn get_user(&self, user_id: &str) -> Result<Option<DomainUser>>;

    /// Retrieve a user by their unique username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<DomainUser>>;

    /// Get the currently active (logged-in) user ID
    async fn get_active_user(&self) -> Result<Option<String>>;

    /// Set the currently active user
    async fn set_active_user(&self, user_id: &str) -> Result<()>;

    /// Clear the active user (logout)
    async fn clear_active_user(&self) -> Result<()>;
}

/// Trait defining the interface for category storage operations
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Store a new category
    async fn store_category(&self, category: &DomainCategory) -> Result<()>;

    /// Retrieve a specific category scoped to a user
    async fn get_category(&self, user_id: &str, category_id: &str)
        -> Result<Option<DomainCategory>>;

    /// List all categories for a user ordered by name
    async fn list_categories(&self, user_id: &str) -> Result<Vec<DomainCategory>>;

    /// Update an existing category
    async fn update_category(&self, category: &DomainCategory) -> Result<()>;

    /// Delete a category; returns true if it existed
    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<bool>;
}

/// Trait defining the interface for transaction storage operations
///
/// This trait abstracts away the specific storage implementation details,
/// allowing the domain layer to work with different storage backends
/// (SQL databases, document collections) without modification.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Store a new transaction
    async fn store_transaction(&self, transaction: &DomainTransaction) -> Result<()>;

    /// Retrieve a specific transaction scoped to a user
    async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<DomainTransaction>>;

    /// List transactions matching the query, newest first, with cursor
    /// pagination
    async fn list_transactions(
        &self,
        user_id: &str,
        query: &TransactionQuery,
    ) -> Result<Vec<DomainTransaction>>;

    /// Update an existing transaction
    async fn update_transaction(&self, transaction: &DomainTransaction) -> Result<()>;

    /// Delete a single transaction; returns true if it existed
    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<bool>;

    /// Delete multiple transactions; returns the number actually deleted
    async fn delete_transactions(&self, user_id: &str, transaction_ids: &[String]) -> Result<u32>;

    /// Check which of the given IDs exist for a user
    async fn check_transactions_exist(
        &self,
        user_id: &str,
        transaction_ids: &[String],
    ) -> Result<Vec<String>>;

    /// Sum of expense-type transaction amounts for a user and category whose
    /// date falls within the inclusive range. Returns 0.0 when nothing
    /// matches.
    async fn sum_expenses_in_range(
        &self,
        user_id: &str,
        category_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64>;
}

/// Trait defining the interface for budget storage operations
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Store a new budget
    async fn store_budget(&self, budget: &DomainBudget) -> Result<()>;

    /// Retrieve a specific budget scoped to a user
    async fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<DomainBudget>>;

    /// List all budgets for a user ordered by start date descending
    async fn list_budgets(&self, user_id: &str) -> Result<Vec<DomainBudget>>;

    /// Update an existing budget
    async fn update_budget(&self, budget: &DomainBudget) -> Result<()>;

    /// Delete a budget; returns true if it existed
    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool>;
}
