use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::budget::Budget;
use crate::storage::document::connection::{ChangeKind, Collection, DocumentConnection};
use crate::storage::traits::BudgetStore;
use crate::storage::StorageError;

/// Budget repository over the document backend
#[derive(Clone)]
pub struct DocumentBudgetRepository {
    store: DocumentConnection,
}

impl DocumentBudgetRepository {
    pub fn new(store: DocumentConnection) -> Self {
        Self { store }
    }

    fn get_scoped(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>> {
        let budget: Option<Budget> = self.store.read_document(Collection::Budgets, budget_id)?;
        Ok(budget.filter(|b| b.user_id == user_id))
    }
}

#[async_trait]
impl BudgetStore for DocumentBudgetRepository {
    async fn store_budget(&self, budget: &Budget) -> Result<()> {
        self.store.write_document(
            Collection::Budgets,
            &budget.id,
            &budget.user_id,
            budget,
            ChangeKind::Created,
        )
    }

    async fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>> {
        self.get_scoped(user_id, budget_id)
    }

    async fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        let mut budgets: Vec<Budget> = self
            .store
            .list_documents::<Budget>(Collection::Budgets)?
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .collect();
        budgets.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(budgets)
    }

    async fn update_budget(&self, budget: &Budget) -> Result<()> {
        if self.get_scoped(&budget.user_id, &budget.id)?.is_none() {
            return Err(StorageError::not_found("budget", &budget.id).into());
        }
        self.store.write_document(
            Collection::Budgets,
            &budget.id,
            &budget.user_id,
            budget,
            ChangeKind::Updated,
        )
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool> {
        if self.get_scoped(user_id, budget_id)?.is_none() {
            return Ok(false);
        }
        self.store
            .delete_document(Collection::Budgets, budget_id, user_id)
    }
}
