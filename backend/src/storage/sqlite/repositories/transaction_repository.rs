use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::transaction::{Transaction, TransactionType};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::{TransactionQuery, TransactionStore};
use crate::storage::StorageError;

/// Repository for transaction operations
#[derive(Clone)]
pub struct TransactionRepository {
    db: DbConnection,
}

impl TransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
        let date: String = row.get("date");
        let type_str: String = row.get("transaction_type");
        let transaction_type = TransactionType::from_str(&type_str)
            .ok_or_else(|| anyhow!("Unknown transaction type in database: {}", type_str))?;

        Ok(Transaction {
            id: row.get("id"),
            user_id: row.get("user_id"),
            category_id: row.get("category_id"),
            amount: row.get("amount"),
            transaction_type,
            date: DateTime::parse_from_rfc3339(&date)?.with_timezone(&Utc),
            note: row.get("note"),
        })
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, category_id, amount, transaction_type, date, note)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.user_id)
        .bind(&transaction.category_id)
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.date.to_rfc3339())
        .bind(&transaction.note)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, category_id, amount, transaction_type, date, note
            FROM transactions
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(transaction_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_transaction(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_transactions(
        &self,
        user_id: &str,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>> {
        // Build the WHERE clause from the optional filters, binding in the
        // same order the placeholders appear.
        let mut sql = String::from(
            "SELECT id, user_id, category_id, amount, transaction_type, date, note \
             FROM transactions \
             WHERE user_id = ?",
        );
        if query.category_id.is_some() {
            sql.push_str(" AND category_id = ?");
        }
        if query.transaction_type.is_some() {
            sql.push_str(" AND transaction_type = ?");
        }
        if query.start_date.is_some() {
            sql.push_str(" AND date(date) >= date(?)");
        }
        if query.end_date.is_some() {
            sql.push_str(" AND date(date) <= date(?)");
        }
        if query.after.is_some() {
            // Cursor: everything strictly after the given transaction in
            // (date DESC, id DESC) order. An unknown cursor yields no rows.
            sql.push_str(
                " AND (date < (SELECT date FROM transactions WHERE id = ?) \
                   OR (date = (SELECT date FROM transactions WHERE id = ?) AND id < ?))",
            );
        }
        sql.push_str(" ORDER BY date DESC, id DESC");
        if query.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut q = sqlx::query(&sql).bind(user_id);
        if let Some(ref category_id) = query.category_id {
            q = q.bind(category_id);
        }
        if let Some(transaction_type) = query.transaction_type {
            q = q.bind(transaction_type.as_str());
        }
        if let Some(start_date) = query.start_date {
            q = q.bind(start_date.to_string());
        }
        if let Some(end_date) = query.end_date {
            q = q.bind(end_date.to_string());
        }
        if let Some(ref after) = query.after {
            q = q.bind(after).bind(after).bind(after);
        }
        if let Some(limit) = query.limit {
            q = q.bind(limit as i64);
        }

        let rows = q.fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET category_id = ?, amount = ?, transaction_type = ?, date = ?, note = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&transaction.category_id)
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.date.to_rfc3339())
        .bind(&transaction.note)
        .bind(&transaction.user_id)
        .bind(&transaction.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("transaction", &transaction.id).into());
        }
        Ok(())
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(transaction_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_transactions(&self, user_id: &str, transaction_ids: &[String]) -> Result<u32> {
        if transaction_ids.is_empty() {
            return Ok(0);
        }

        // Create placeholders for the IN clause
        let placeholders = transaction_ids
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(",");
        let query_str = format!(
            "DELETE FROM transactions WHERE user_id = ? AND id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&query_str);
        query = query.bind(user_id);
        for id in transaction_ids {
            query = query.bind(id);
        }

        let result = query.execute(self.db.pool()).await?;
        Ok(result.rows_affected() as u32)
    }

    async fn check_transactions_exist(
        &self,
        user_id: &str,
        transaction_ids: &[String],
    ) -> Result<Vec<String>> {
        if transaction_ids.is_empty() {
            return Ok(vec![]);
        }

        let placeholders = transaction_ids
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(",");
        let query_str = format!(
            "SELECT id FROM transactions WHERE user_id = ? AND id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&query_str);
        query = query.bind(user_id);
        for id in transaction_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(self.db.pool()).await?;
        Ok(rows.iter().map(|row| row.get("id")).collect())
    }

    async fn sum_expenses_in_range(
        &self,
        user_id: &str,
        category_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount), 0.0) AS total
            FROM transactions
            WHERE user_id = ?
              AND category_id = ?
              AND transaction_type = 'expense'
              AND date(date) >= date(?)
              AND date(date) <= date(?)
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .bind(start_date.to_string())
        .bind(end_date.to_string())
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.get("total"))
    }
}
