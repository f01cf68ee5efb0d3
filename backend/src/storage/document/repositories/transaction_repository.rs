use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::transaction::{Transaction, TransactionType};
use crate::storage::document::connection::{ChangeKind, Collection, DocumentConnection};
use crate::storage::traits::{TransactionQuery, TransactionStore};
use crate::storage::StorageError;

/// Transaction repository over the document backend.
///
/// The document store has no query engine, so filtering, ordering and the
/// pagination cursor are applied in memory after loading the collection.
#[derive(Clone)]
pub struct DocumentTransactionRepository {
    store: DocumentConnection,
}

impl DocumentTransactionRepository {
    pub fn new(store: DocumentConnection) -> Self {
        Self { store }
    }

    fn get_scoped(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>> {
        let transaction: Option<Transaction> = self
            .store
            .read_document(Collection::Transactions, transaction_id)?;
        Ok(transaction.filter(|t| t.user_id == user_id))
    }

    fn load_for_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let transactions = self
            .store
            .list_documents::<Transaction>(Collection::Transactions)?
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect();
        Ok(transactions)
    }

    fn matches(transaction: &Transaction, query: &TransactionQuery) -> bool {
        if let Some(category_id) = &query.category_id {
            if &transaction.category_id != category_id {
                return false;
            }
        }
        if let Some(transaction_type) = query.transaction_type {
            if transaction.transaction_type != transaction_type {
                return false;
            }
        }
        let date = transaction.date.date_naive();
        if let Some(start) = query.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = query.end_date {
            if date > end {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl TransactionStore for DocumentTransactionRepository {
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        self.store.write_document(
            Collection::Transactions,
            &transaction.id,
            &transaction.user_id,
            transaction,
            ChangeKind::Created,
        )
    }

    async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>> {
        self.get_scoped(user_id, transaction_id)
    }

    async fn list_transactions(
        &self,
        user_id: &str,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .load_for_user(user_id)?
            .into_iter()
            .filter(|t| Self::matches(t, query))
            .collect();

        // Newest first, ties broken by ID so pagination is stable
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

        if let Some(after) = &query.after {
            // Unknown cursor means the caller paged past the end
            match transactions.iter().position(|t| &t.id == after) {
                Some(position) => {
                    transactions.drain(..=position);
                }
                None => return Ok(Vec::new()),
            }
        }

        if let Some(limit) = query.limit {
            transactions.truncate(limit as usize);
        }
        Ok(transactions)
    }

    async fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        if self
            .get_scoped(&transaction.user_id, &transaction.id)?
            .is_none()
        {
            return Err(StorageError::not_found("transaction", &transaction.id).into());
        }
        self.store.write_document(
            Collection::Transactions,
            &transaction.id,
            &transaction.user_id,
            transaction,
            ChangeKind::Updated,
        )
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<bool> {
        if self.get_scoped(user_id, transaction_id)?.is_none() {
            return Ok(false);
        }
        self.store
            .delete_document(Collection::Transactions, transaction_id, user_id)
    }

    async fn delete_transactions(&self, user_id: &str, transaction_ids: &[String]) -> Result<u32> {
        let mut deleted = 0u32;
        for transaction_id in transaction_ids {
            if self.delete_transaction(user_id, transaction_id).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn check_transactions_exist(
        &self,
        user_id: &str,
        transaction_ids: &[String],
    ) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for transaction_id in transaction_ids {
            if self.get_scoped(user_id, transaction_id)?.is_some() {
                found.push(transaction_id.clone());
            }
        }
        Ok(found)
    }

    async fn sum_expenses_in_range(
        &self,
        user_id: &str,
        category_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64> {
        let total = self
            .load_for_user(user_id)?
            .iter()
            .filter(|t| {
                t.transaction_type == TransactionType::Expense
                    && t.category_id == category_id
                    && t.date.date_naive() >= start_date
                    && t.date.date_naive() <= end_date
            })
            .map(|t| t.amount)
            .sum();
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn setup_repo() -> (DocumentTransactionRepository, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = DocumentConnection::new(temp_dir.path()).unwrap();
        (DocumentTransactionRepository::new(store), temp_dir)
    }

    fn test_transaction(
        id: &str,
        user_id: &str,
        category_id: &str,
        amount: f64,
        transaction_type: TransactionType,
        day: u32,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            user_id: user_id.to_string(),
            category_id: category_id.to_string(),
            amount,
            transaction_type,
            date: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
            note: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_read_returns_same_fields() {
        let (repo, _temp_dir) = setup_repo();
        let mut transaction = test_transaction(
            "ex-1-aaaa",
            "user-1-aaaa",
            "cat-1-aaaa",
            25.50,
            TransactionType::Expense,
            10,
        );
        transaction.note = Some("Lunch with team".to_string());
        repo.store_transaction(&transaction).await.unwrap();

        let retrieved = repo
            .get_transaction("user-1-aaaa", "ex-1-aaaa")
            .await
            .unwrap()
            .expect("Transaction should exist");
        assert_eq!(retrieved, transaction);
    }

    #[tokio::test]
    async fn test_list_newest_first_and_user_scoped() {
        let (repo, _temp_dir) = setup_repo();
        for tx in [
            test_transaction("ex-1-aaaa", "user-1-aaaa", "cat-1-aaaa", 10.0, TransactionType::Expense, 5),
            test_transaction("in-2-bbbb", "user-1-aaaa", "cat-1-aaaa", 500.0, TransactionType::Income, 20),
            test_transaction("ex-3-cccc", "user-2-bbbb", "cat-2-bbbb", 99.0, TransactionType::Expense, 25),
        ] {
            repo.store_transaction(&tx).await.unwrap();
        }

        let transactions = repo
            .list_transactions("user-1-aaaa", &TransactionQuery::default())
            .await
            .unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, "in-2-bbbb");
        assert_eq!(transactions[1].id, "ex-1-aaaa");
    }

    #[tokio::test]
    async fn test_list_with_filters() {
        let (repo, _temp_dir) = setup_repo();
        for tx in [
            test_transaction("ex-1-aaaa", "user-1-aaaa", "cat-1-aaaa", 10.0, TransactionType::Expense, 5),
            test_transaction("ex-2-bbbb", "user-1-aaaa", "cat-2-bbbb", 20.0, TransactionType::Expense, 10),
            test_transaction("in-3-cccc", "user-1-aaaa", "cat-1-aaaa", 500.0, TransactionType::Income, 15),
        ] {
            repo.store_transaction(&tx).await.unwrap();
        }

        let query = TransactionQuery {
            category_id: Some("cat-1-aaaa".to_string()),
            transaction_type: Some(TransactionType::Expense),
            ..Default::default()
        };
        let transactions = repo.list_transactions("user-1-aaaa", &query).await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, "ex-1-aaaa");

        let query = TransactionQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 6, 8),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 12),
            ..Default::default()
        };
        let transactions = repo.list_transactions("user-1-aaaa", &query).await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, "ex-2-bbbb");
    }

    #[tokio::test]
    async fn test_pagination_cursor() {
        let (repo, _temp_dir) = setup_repo();
        for day in 1..=5 {
            repo.store_transaction(&test_transaction(
                &format!("ex-{}-aaaa", day),
                "user-1-aaaa",
                "cat-1-aaaa",
                10.0,
                TransactionType::Expense,
                day,
            ))
            .await
            .unwrap();
        }

        let first_page = repo
            .list_transactions(
                "user-1-aaaa",
                &TransactionQuery {
                    limit: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].id, "ex-5-aaaa");
        assert_eq!(first_page[1].id, "ex-4-aaaa");

        let second_page = repo
            .list_transactions(
                "user-1-aaaa",
                &TransactionQuery {
                    limit: Some(2),
                    after: Some("ex-4-aaaa".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(second_page.len(), 2);
        assert_eq!(second_page[0].id, "ex-3-aaaa");
        assert_eq!(second_page[1].id, "ex-2-aaaa");
    }

    #[tokio::test]
    async fn test_unknown_cursor_returns_empty_page() {
        let (repo, _temp_dir) = setup_repo();
        repo.store_transaction(&test_transaction(
            "ex-1-aaaa",
            "user-1-aaaa",
            "cat-1-aaaa",
            10.0,
            TransactionType::Expense,
            5,
        ))
        .await
        .unwrap();

        let page = repo
            .list_transactions(
                "user-1-aaaa",
                &TransactionQuery {
                    after: Some("ex-0-dead".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_update_transaction() {
        let (repo, _temp_dir) = setup_repo();
        let mut transaction = test_transaction(
            "ex-1-aaaa",
            "user-1-aaaa",
            "cat-1-aaaa",
            10.0,
            TransactionType::Expense,
            5,
        );
        repo.store_transaction(&transaction).await.unwrap();

        transaction.amount = 12.75;
        transaction.note = Some("Corrected amount".to_string());
        repo.update_transaction(&transaction).await.unwrap();

        let retrieved = repo
            .get_transaction("user-1-aaaa", "ex-1-aaaa")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.amount, 12.75);
        assert_eq!(retrieved.note, Some("Corrected amount".to_string()));
    }

    #[tokio::test]
    async fn test_bulk_delete_counts_only_existing() {
        let (repo, _temp_dir) = setup_repo();
        for id in ["ex-1-aaaa", "ex-2-bbbb"] {
            repo.store_transaction(&test_transaction(
                id,
                "user-1-aaaa",
                "cat-1-aaaa",
                10.0,
                TransactionType::Expense,
                5,
            ))
            .await
            .unwrap();
        }

        let ids = vec![
            "ex-1-aaaa".to_string(),
            "ex-2-bbbb".to_string(),
            "ex-9-dead".to_string(),
        ];
        let found = repo
            .check_transactions_exist("user-1-aaaa", &ids)
            .await
            .unwrap();
        assert_eq!(found, vec!["ex-1-aaaa".to_string(), "ex-2-bbbb".to_string()]);

        let deleted = repo.delete_transactions("user-1-aaaa", &ids).await.unwrap();
        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_sum_expenses_defaults_to_zero() {
        let (repo, _temp_dir) = setup_repo();
        let total = repo
            .sum_expenses_in_range(
                "user-1-aaaa",
                "cat-1-aaaa",
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(total, 0.0);
    }

    #[tokio::test]
    async fn test_sum_expenses_ignores_income_and_other_categories() {
        let (repo, _temp_dir) = setup_repo();
        for tx in [
            test_transaction("ex-1-aaaa", "user-1-aaaa", "cat-1-aaaa", 12.0, TransactionType::Expense, 10),
            test_transaction("ex-2-bbbb", "user-1-aaaa", "cat-1-aaaa", 8.0, TransactionType::Expense, 20),
            test_transaction("in-3-cccc", "user-1-aaaa", "cat-1-aaaa", 500.0, TransactionType::Income, 15),
            test_transaction("ex-4-dddd", "user-1-aaaa", "cat-2-bbbb", 40.0, TransactionType::Expense, 15),
            test_transaction("ex-5-eeee", "user-2-bbbb", "cat-1-aaaa", 70.0, TransactionType::Expense, 15),
        ] {
            repo.store_transaction(&tx).await.unwrap();
        }

        let total = repo
            .sum_expenses_in_range(
                "user-1-aaaa",
                "cat-1-aaaa",
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(total, 20.0);
    }

    #[tokio::test]
    async fn test_sum_expenses_range_is_inclusive() {
        let (repo, _temp_dir) = setup_repo();
        for (id, day) in [("ex-1-aaaa", 1), ("ex-2-bbbb", 15), ("ex-3-cccc", 30)] {
            repo.store_transaction(&test_transaction(
                id,
                "user-1-aaaa",
                "cat-1-aaaa",
                1.0,
                TransactionType::Expense,
                day,
            ))
            .await
            .unwrap();
        }

        let total = repo
            .sum_expenses_in_range(
                "user-1-aaaa",
                "cat-1-aaaa",
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(total, 3.0);
    }
}
