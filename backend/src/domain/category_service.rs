//! Category management for the active user.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::domain::commands::categories::{CreateCategoryCommand, UpdateCategoryCommand};
use crate::domain::models::{self, category::Category};
use crate::domain::DomainError;
use crate::storage::traits::{CategoryStore, UserStore};
use crate::storage::StorageError;

const MAX_NAME_LENGTH: usize = 64;

#[derive(Clone)]
pub struct CategoryService {
    category_store: Arc<dyn CategoryStore>,
    user_store: Arc<dyn UserStore>,
}

impl CategoryService {
    pub fn new(category_store: Arc<dyn CategoryStore>, user_store: Arc<dyn UserStore>) -> Self {
        Self {
            category_store,
            user_store,
        }
    }

    async fn active_user_id(&self) -> Result<String> {
        self.user_store
            .get_active_user()
            .await?
            .ok_or_else(|| anyhow::Error::from(DomainError::NotLoggedIn))
    }

    fn validate_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Category name cannot be empty".to_string()).into());
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::Validation(format!(
                "Category name cannot exceed {} characters",
                MAX_NAME_LENGTH
            ))
            .into());
        }
        Ok(name.to_string())
    }

    pub async fn create_category(&self, command: CreateCategoryCommand) -> Result<Category> {
        let user_id = self.active_user_id().await?;
        let name = Self::validate_name(&command.name)?;

        let category = Category {
            id: Category::generate_id(models::epoch_millis()),
            user_id,
            name,
            color: command.color,
            icon: command.icon,
        };
        self.category_store.store_category(&category).await?;

        info!("Created category {} for user {}", category.id, category.user_id);
        Ok(category)
    }

    pub async fn get_category(&self, category_id: &str) -> Result<Category> {
        let user_id = self.active_user_id().await?;
        self.category_store
            .get_category(&user_id, category_id)
            .await?
            .ok_or_else(|| StorageError::not_found("category", category_id).into())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let user_id = self.active_user_id().await?;
        self.category_store.list_categories(&user_id).await
    }

    pub async fn update_category(&self, command: UpdateCategoryCommand) -> Result<Category> {
        let mut category = self.get_category(&command.category_id).await?;

        if let Some(name) = command.name {
            category.name = Self::validate_name(&name)?;
        }
        if let Some(color) = command.color {
            category.color = color;
        }
        if let Some(icon) = command.icon {
            category.icon = icon;
        }

        self.category_store.update_category(&category).await?;
        info!("Updated category {}", category.id);
        Ok(category)
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<()> {
        let user_id = self.active_user_id().await?;
        let deleted = self
            .category_store
            .delete_category(&user_id, category_id)
            .await?;
        if !deleted {
            return Err(StorageError::not_found("category", category_id).into());
        }
        info!("Deleted category {}", category_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::auth::RegisterCommand;
    use crate::domain::user_service::UserService;
    use crate::storage::sqlite::repositories::{CategoryRepository, UserRepository};
    use crate::storage::sqlite::DbConnection;

    async fn setup_service() -> CategoryService {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        let user_store = Arc::new(UserRepository::new(db.clone()));
        let user_service = UserService::new(user_store.clone());

        let user = user_service
            .register(RegisterCommand {
                username: "alice".to_string(),
                password: "Password1!".to_string(),
            })
            .await
            .unwrap();
        user_store.set_active_user(&user.id).await.unwrap();

        CategoryService::new(Arc::new(CategoryRepository::new(db)), user_store)
    }

    fn create_command(name: &str) -> CreateCategoryCommand {
        CreateCategoryCommand {
            name: name.to_string(),
            color: 0xFF6750A4,
            icon: "shopping_cart".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_categories() {
        let service = setup_service().await;
        service.create_category(create_command("Transport")).await.unwrap();
        service.create_category(create_command("Groceries")).await.unwrap();

        let categories = service.list_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Groceries");
    }

    #[tokio::test]
    async fn test_create_trims_and_rejects_empty_name() {
        let service = setup_service().await;
        let category = service
            .create_category(create_command("  Dining  "))
            .await
            .unwrap();
        assert_eq!(category.name, "Dining");

        assert!(service.create_category(create_command("   ")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_category_applies_only_provided_fields() {
        let service = setup_service().await;
        let category = service.create_category(create_command("Food")).await.unwrap();

        let updated = service
            .update_category(UpdateCategoryCommand {
                category_id: category.id.clone(),
                name: Some("Dining".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Dining");
        assert_eq!(updated.color, category.color);
        assert_eq!(updated.icon, category.icon);
    }

    #[tokio::test]
    async fn test_delete_missing_category_fails() {
        let service = setup_service().await;
        assert!(service.delete_category("cat-0-dead").await.is_err());
    }

    #[tokio::test]
    async fn test_operations_require_login() {
        let db = DbConnection::init_test().await.unwrap();
        let user_store = Arc::new(UserRepository::new(db.clone()));
        let service = CategoryService::new(Arc::new(CategoryRepository::new(db)), user_store);

        assert!(service.list_categories().await.is_err());
        assert!(service.create_category(create_command("Food")).await.is_err());
    }
}
