//! Transaction management: creation, listing with cursor pagination,
//! updates, and single or bulk deletion.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use shared::TransactionLimits;
use tracing::info;

use crate::domain::commands::transactions::{
    CreateTransactionCommand, DeleteTransactionsCommand, DeleteTransactionsResult, PaginationInfo,
    TransactionListQuery, TransactionListResult, UpdateTransactionCommand,
};
use crate::domain::models::{self, transaction::Transaction};
use crate::domain::DomainError;
use crate::storage::traits::{CategoryStore, TransactionQuery, TransactionStore, UserStore};
use crate::storage::StorageError;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct TransactionService {
    transaction_store: Arc<dyn TransactionStore>,
    category_store: Arc<dyn CategoryStore>,
    user_store: Arc<dyn UserStore>,
    limits: TransactionLimits,
}

impl TransactionService {
    pub fn new(
        transaction_store: Arc<dyn TransactionStore>,
        category_store: Arc<dyn CategoryStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            transaction_store,
            category_store,
            user_store,
            limits: TransactionLimits::default(),
        }
    }

    /// Form limits for clients (amount bounds, note length)
    pub fn transaction_limits(&self) -> TransactionLimits {
        self.limits.clone()
    }

    async fn active_user_id(&self) -> Result<String> {
        self.user_store
            .get_active_user()
            .await?
            .ok_or_else(|| anyhow::Error::from(DomainError::NotLoggedIn))
    }

    fn validate_amount(&self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < self.limits.min_amount {
            return Err(DomainError::Validation(format!(
                "Amount must be at least {}{}",
                self.limits.currency_symbol, self.limits.min_amount
            ))
            .into());
        }
        if amount > self.limits.max_amount {
            return Err(DomainError::Validation(format!(
                "Amount cannot exceed {}{}",
                self.limits.currency_symbol, self.limits.max_amount
            ))
            .into());
        }
        Ok(())
    }

    fn validate_note(&self, note: &Option<String>) -> Result<()> {
        if let Some(note) = note {
            if note.chars().count() > self.limits.max_note_length {
                return Err(DomainError::Validation(format!(
                    "Note cannot exceed {} characters",
                    self.limits.max_note_length
                ))
                .into());
            }
        }
        Ok(())
    }

    async fn require_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        if self
            .category_store
            .get_category(user_id, category_id)
            .await?
            .is_none()
        {
            return Err(StorageError::not_found("category", category_id).into());
        }
        Ok(())
    }

    pub async fn create_transaction(
        &self,
        command: CreateTransactionCommand,
    ) -> Result<Transaction> {
        let user_id = self.active_user_id().await?;

        self.validate_amount(command.amount)?;
        self.validate_note(&command.note)?;
        self.require_category(&user_id, &command.category_id).await?;

        let transaction = Transaction {
            id: Transaction::generate_id(command.transaction_type, models::epoch_millis()),
            user_id,
            category_id: command.category_id,
            amount: command.amount,
            transaction_type: command.transaction_type,
            date: command.date.unwrap_or_else(Utc::now),
            note: command.note,
        };
        self.transaction_store.store_transaction(&transaction).await?;

        info!(
            "Recorded {} of {} for user {}",
            transaction.transaction_type.as_str(),
            transaction.amount,
            transaction.user_id
        );
        Ok(transaction)
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let user_id = self.active_user_id().await?;
        self.transaction_store
            .get_transaction(&user_id, transaction_id)
            .await?
            .ok_or_else(|| StorageError::not_found("transaction", transaction_id).into())
    }

    /// List transactions newest first. Fetches one row beyond the page size
    /// to learn whether another page exists.
    pub async fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> Result<TransactionListResult> {
        let user_id = self.active_user_id().await?;

        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let storage_query = TransactionQuery {
            category_id: query.category_id,
            transaction_type: query.transaction_type,
            start_date: query.start_date,
            end_date: query.end_date,
            limit: Some(limit + 1),
            after: query.after,
        };

        let mut transactions = self
            .transaction_store
            .list_transactions(&user_id, &storage_query)
            .await?;

        let has_more = transactions.len() > limit as usize;
        if has_more {
            transactions.truncate(limit as usize);
        }
        let next_cursor = if has_more {
            transactions.last().map(|t| t.id.clone())
        } else {
            None
        };

        Ok(TransactionListResult {
            transactions,
            pagination: PaginationInfo {
                has_more,
                next_cursor,
            },
        })
    }

    pub async fn update_transaction(
        &self,
        command: UpdateTransactionCommand,
    ) -> Result<Transaction> {
        let mut transaction = self.get_transaction(&command.transaction_id).await?;

        if let Some(category_id) = command.category_id {
            self.require_category(&transaction.user_id, &category_id)
                .await?;
            transaction.category_id = category_id;
        }
        if let Some(amount) = command.amount {
            self.validate_amount(amount)?;
            transaction.amount = amount;
        }
        if let Some(transaction_type) = command.transaction_type {
            transaction.transaction_type = transaction_type;
        }
        if let Some(date) = command.date {
            transaction.date = date;
        }
        if command.note.is_some() {
            self.validate_note(&command.note)?;
            transaction.note = command.note;
        }

        self.transaction_store.update_transaction(&transaction).await?;
        info!("Updated transaction {}", transaction.id);
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        let user_id = self.active_user_id().await?;
        let deleted = self
            .transaction_store
            .delete_transaction(&user_id, transaction_id)
            .await?;
        if !deleted {
            return Err(StorageError::not_found("transaction", transaction_id).into());
        }
        info!("Deleted transaction {}", transaction_id);
        Ok(())
    }

    /// Delete several transactions at once. IDs that do not exist are
    /// reported back rather than failing the whole request.
    pub async fn delete_transactions(
        &self,
        command: DeleteTransactionsCommand,
    ) -> Result<DeleteTransactionsResult> {
        let user_id = self.active_user_id().await?;

        if command.transaction_ids.is_empty() {
            return Err(
                DomainError::Validation("No transaction IDs provided".to_string()).into(),
            );
        }

        let found = self
            .transaction_store
            .check_transactions_exist(&user_id, &command.transaction_ids)
            .await?;
        let not_found_ids: Vec<String> = command
            .transaction_ids
            .iter()
            .filter(|id| !found.contains(id))
            .cloned()
            .collect();

        let deleted_count = self
            .transaction_store
            .delete_transactions(&user_id, &found)
            .await? as usize;

        info!(
            "Deleted {} transaction(s) for user {} ({} not found)",
            deleted_count,
            user_id,
            not_found_ids.len()
        );
        Ok(DeleteTransactionsResult {
            deleted_count,
            success_message: format!("Deleted {} transaction(s)", deleted_count),
            not_found_ids,
        })
    }
}
