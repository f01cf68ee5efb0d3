use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::category::Category;
use crate::storage::document::connection::{ChangeKind, Collection, DocumentConnection};
use crate::storage::traits::CategoryStore;
use crate::storage::StorageError;

/// Category repository over the document backend
#[derive(Clone)]
pub struct DocumentCategoryRepository {
    store: DocumentConnection,
}

impl DocumentCategoryRepository {
    pub fn new(store: DocumentConnection) -> Self {
        Self { store }
    }

    fn get_scoped(&self, user_id: &str, category_id: &str) -> Result<Option<Category>> {
        let category: Option<Category> =
            self.store.read_document(Collection::Categories, category_id)?;
        Ok(category.filter(|c| c.user_id == user_id))
    }
}

#[async_trait]
impl CategoryStore for DocumentCategoryRepository {
    async fn store_category(&self, category: &Category) -> Result<()> {
        self.store.write_document(
            Collection::Categories,
            &category.id,
            &category.user_id,
            category,
            ChangeKind::Created,
        )
    }

    async fn get_category(&self, user_id: &str, category_id: &str) -> Result<Option<Category>> {
        self.get_scoped(user_id, category_id)
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .store
            .list_documents::<Category>(Collection::Categories)?
            .into_iter()
            .filter(|c| c.user_id == user_id)
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update_category(&self, category: &Category) -> Result<()> {
        if self.get_scoped(&category.user_id, &category.id)?.is_none() {
            return Err(StorageError::not_found("category", &category.id).into());
        }
        self.store.write_document(
            Collection::Categories,
            &category.id,
            &category.user_id,
            category,
            ChangeKind::Updated,
        )
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<bool> {
        if self.get_scoped(user_id, category_id)?.is_none() {
            return Ok(false);
        }
        self.store
            .delete_document(Collection::Categories, category_id, user_id)
    }
}
