use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::category::Category;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::CategoryStore;
use crate::storage::StorageError;

/// Repository for category operations
#[derive(Clone)]
pub struct CategoryRepository {
    db: DbConnection,
}

impl CategoryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_category(row: &SqliteRow) -> Category {
        Category {
            id: row.get("id"),
            user_id: row.get("user_id"),
            name: row.get("name"),
            color: row.get("color"),
            icon: row.get("icon"),
        }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn store_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, user_id, name, color, icon)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.id)
        .bind(&category.user_id)
        .bind(&category.name)
        .bind(category.color)
        .bind(&category.icon)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_category(&self, user_id: &str, category_id: &str) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, color, icon
            FROM categories
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::row_to_category))
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, color, icon
            FROM categories
            WHERE user_id = ?
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::row_to_category).collect())
    }

    async fn update_category(&self, category: &Category) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, color = ?, icon = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&category.name)
        .bind(category.color)
        .bind(&category.icon)
        .bind(&category.user_id)
        .bind(&category.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("category", &category.id).into());
        }
        Ok(())
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM categories WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models;

    async fn setup_repo() -> CategoryRepository {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        CategoryRepository::new(db)
    }

    fn test_category(user_id: &str, name: &str) -> Category {
        Category {
            id: Category::generate_id(models::epoch_millis()),
            user_id: user_id.to_string(),
            name: name.to_string(),
            color: 0xFF6750A4,
            icon: "shopping_cart".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_read_returns_same_fields() {
        let repo = setup_repo().await;
        let category = test_category("user-1-aaaa", "Groceries");

        repo.store_category(&category).await.unwrap();

        let retrieved = repo
            .get_category("user-1-aaaa", &category.id)
            .await
            .unwrap()
            .expect("Category should exist");
        assert_eq!(retrieved, category);
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_user_and_ordered_by_name() {
        let repo = setup_repo().await;
        repo.store_category(&test_category("user-1-aaaa", "Transport"))
            .await
            .unwrap();
        repo.store_category(&test_category("user-1-aaaa", "Groceries"))
            .await
            .unwrap();
        repo.store_category(&test_category("user-2-bbbb", "Rent"))
            .await
            .unwrap();

        let categories = repo.list_categories("user-1-aaaa").await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Groceries");
        assert_eq!(categories[1].name, "Transport");
    }

    #[tokio::test]
    async fn test_update_category() {
        let repo = setup_repo().await;
        let mut category = test_category("user-1-aaaa", "Food");
        repo.store_category(&category).await.unwrap();

        category.name = "Dining".to_string();
        category.color = 0x00FF0000;
        repo.update_category(&category).await.unwrap();

        let retrieved = repo
            .get_category("user-1-aaaa", &category.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.name, "Dining");
        assert_eq!(retrieved.color, 0x00FF0000);
    }

    #[tokio::test]
    async fn test_update_missing_category_fails() {
        let repo = setup_repo().await;
        let category = test_category("user-1-aaaa", "Ghost");
        let result = repo.update_category(&category).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_category() {
        let repo = setup_repo().await;
        let category = test_category("user-1-aaaa", "Travel");
        repo.store_category(&category).await.unwrap();

        assert!(repo.delete_category("user-1-aaaa", &category.id).await.unwrap());
        assert!(!repo.delete_category("user-1-aaaa", &category.id).await.unwrap());
        assert!(repo
            .get_category("user-1-aaaa", &category.id)
            .await
            .unwrap()
            .is_none());
    }
}
