use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::budget::Budget;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::BudgetStore;
use crate::storage::StorageError;

/// Repository for budget operations
#[derive(Clone)]
pub struct BudgetRepository {
    db: DbConnection,
}

impl BudgetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn parse_date(value: &str) -> Result<NaiveDate> {
        value
            .parse::<NaiveDate>()
            .map_err(|_| anyhow!("Invalid date in database: {}", value))
    }

    fn row_to_budget(row: &SqliteRow) -> Result<Budget> {
        let start_date: String = row.get("start_date");
        let end_date: String = row.get("end_date");
        Ok(Budget {
            id: row.get("id"),
            user_id: row.get("user_id"),
            category_id: row.get("category_id"),
            name: row.get("name"),
            min_goal: row.get("min_goal"),
            max_goal: row.get("max_goal"),
            start_date: Self::parse_date(&start_date)?,
            end_date: Self::parse_date(&end_date)?,
        })
    }
}

#[async_trait]
impl BudgetStore for BudgetRepository {
    async fn store_budget(&self, budget: &Budget) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (id, user_id, category_id, name, min_goal, max_goal, start_date, end_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&budget.id)
        .bind(&budget.user_id)
        .bind(&budget.category_id)
        .bind(&budget.name)
        .bind(budget.min_goal)
        .bind(budget.max_goal)
        .bind(budget.start_date.to_string())
        .bind(budget.end_date.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, category_id, name, min_goal, max_goal, start_date, end_date
            FROM budgets
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(budget_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_budget(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, category_id, name, min_goal, max_goal, start_date, end_date
            FROM budgets
            WHERE user_id = ?
            ORDER BY start_date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_budget).collect()
    }

    async fn update_budget(&self, budget: &Budget) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE budgets
            SET category_id = ?, name = ?, min_goal = ?, max_goal = ?, start_date = ?, end_date = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&budget.category_id)
        .bind(&budget.name)
        .bind(budget.min_goal)
        .bind(budget.max_goal)
        .bind(budget.start_date.to_string())
        .bind(budget.end_date.to_string())
        .bind(&budget.user_id)
        .bind(&budget.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("budget", &budget.id).into());
        }
        Ok(())
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM budgets WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(budget_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models;

    async fn setup_repo() -> BudgetRepository {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        BudgetRepository::new(db)
    }

    fn test_budget(user_id: &str, name: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> Budget {
        Budget {
            id: Budget::generate_id(models::epoch_millis()),
            user_id: user_id.to_string(),
            category_id: "cat-1-aaaa".to_string(),
            name: name.to_string(),
            min_goal: 50.0,
            max_goal: 300.0,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_then_read_returns_same_fields() {
        let repo = setup_repo().await;
        let budget = test_budget("user-1-aaaa", "June groceries", (2025, 6, 1), (2025, 6, 30));

        repo.store_budget(&budget).await.unwrap();

        let retrieved = repo
            .get_budget("user-1-aaaa", &budget.id)
            .await
            .unwrap()
            .expect("Budget should exist");
        assert_eq!(retrieved, budget);
    }

    #[tokio::test]
    async fn test_list_budgets_scoped_and_ordered() {
        let repo = setup_repo().await;
        let may = test_budget("user-1-aaaa", "May", (2025, 5, 1), (2025, 5, 31));
        let june = test_budget("user-1-aaaa", "June", (2025, 6, 1), (2025, 6, 30));
        let other = test_budget("user-2-bbbb", "Other", (2025, 6, 1), (2025, 6, 30));
        repo.store_budget(&may).await.unwrap();
        repo.store_budget(&june).await.unwrap();
        repo.store_budget(&other).await.unwrap();

        let budgets = repo.list_budgets("user-1-aaaa").await.unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].name, "June");
        assert_eq!(budgets[1].name, "May");
    }

    #[tokio::test]
    async fn test_update_budget() {
        let repo = setup_repo().await;
        let mut budget = test_budget("user-1-aaaa", "Dining", (2025, 6, 1), (2025, 6, 30));
        repo.store_budget(&budget).await.unwrap();

        budget.max_goal = 500.0;
        budget.end_date = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        repo.update_budget(&budget).await.unwrap();

        let retrieved = repo
            .get_budget("user-1-aaaa", &budget.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.max_goal, 500.0);
        assert_eq!(retrieved.end_date, NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_budget_fails() {
        let repo = setup_repo().await;
        let budget = test_budget("user-1-aaaa", "Ghost", (2025, 6, 1), (2025, 6, 30));
        assert!(repo.update_budget(&budget).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_budget() {
        let repo = setup_repo().await;
        let budget = test_budget("user-1-aaaa", "Travel", (2025, 6, 1), (2025, 6, 30));
        repo.store_budget(&budget).await.unwrap();

        assert!(repo.delete_budget("user-1-aaaa", &budget.id).await.unwrap());
        assert!(!repo.delete_budget("user-1-aaaa", &budget.id).await.unwrap());
    }
}
