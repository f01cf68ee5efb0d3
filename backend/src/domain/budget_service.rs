//! Budget management and spending-progress calculation.
//!
//! A budget's current amount is never stored; every read recomputes it by
//! summing the matching expense transactions, so deleting or editing a
//! transaction is reflected immediately.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::domain::commands::budgets::{CreateBudgetCommand, UpdateBudgetCommand};
use crate::domain::models;
use crate::domain::models::budget::{Budget, BudgetProgress};
use crate::domain::DomainError;
use crate::storage::traits::{BudgetStore, CategoryStore, TransactionStore, UserStore};
use crate::storage::StorageError;

#[derive(Clone)]
pub struct BudgetService {
    budget_store: Arc<dyn BudgetStore>,
    transaction_store: Arc<dyn TransactionStore>,
    category_store: Arc<dyn CategoryStore>,
    user_store: Arc<dyn UserStore>,
}

impl BudgetService {
    pub fn new(
        budget_store: Arc<dyn BudgetStore>,
        transaction_store: Arc<dyn TransactionStore>,
        category_store: Arc<dyn CategoryStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            budget_store,
            transaction_store,
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

    fn validate_goals(min_goal: f64, max_goal: f64) -> Result<()> {
        if !min_goal.is_finite() || !max_goal.is_finite() || min_goal < 0.0 || max_goal < 0.0 {
            return Err(DomainError::Validation(
                "Budget goals must be non-negative amounts".to_string(),
            )
            .into());
        }
        if min_goal > max_goal {
            return Err(DomainError::Validation(
                "Minimum goal cannot exceed maximum goal".to_string(),
            )
            .into());
        }
        Ok(())
    }

    fn validate_budget(budget: &Budget) -> Result<()> {
        if budget.name.trim().is_empty() {
            return Err(DomainError::Validation("Budget name cannot be empty".to_string()).into());
        }
        Self::validate_goals(budget.min_goal, budget.max_goal)?;
        if budget.start_date > budget.end_date {
            return Err(DomainError::Validation(
                "Budget start date must be on or before its end date".to_string(),
            )
            .into());
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

    /// Derive the spending total for a budget from its expense transactions.
    async fn progress(&self, budget: Budget) -> Result<BudgetProgress> {
        let current_amount = self
            .transaction_store
            .sum_expenses_in_range(
                &budget.user_id,
                &budget.category_id,
                budget.start_date,
                budget.end_date,
            )
            .await?;
        Ok(BudgetProgress {
            budget,
            current_amount,
        })
    }

    pub async fn create_budget(&self, command: CreateBudgetCommand) -> Result<BudgetProgress> {
        let user_id = self.active_user_id().await?;
        self.require_category(&user_id, &command.category_id).await?;

        let budget = Budget {
            id: Budget::generate_id(models::epoch_millis()),
            user_id,
            category_id: command.category_id,
            name: command.name.trim().to_string(),
            min_goal: command.min_goal,
            max_goal: command.max_goal,
            start_date: command.start_date,
            end_date: command.end_date,
        };
        Self::validate_budget(&budget)?;

        self.budget_store.store_budget(&budget).await?;
        info!("Created budget {} for user {}", budget.id, budget.user_id);

        self.progress(budget).await
    }

    pub async fn get_budget(&self, budget_id: &str) -> Result<BudgetProgress> {
        let user_id = self.active_user_id().await?;
        let budget = self
            .budget_store
            .get_budget(&user_id, budget_id)
            .await?
            .ok_or_else(|| anyhow::Error::from(StorageError::not_found("budget", budget_id)))?;
        self.progress(budget).await
    }

    pub async fn list_budgets(&self) -> Result<Vec<BudgetProgress>> {
        let user_id = self.active_user_id().await?;
        let budgets = self.budget_store.list_budgets(&user_id).await?;

        let mut progress = Vec::with_capacity(budgets.len());
        for budget in budgets {
            progress.push(self.progress(budget).await?);
        }
        Ok(progress)
    }

    pub async fn update_budget(&self, command: UpdateBudgetCommand) -> Result<BudgetProgress> {
        let user_id = self.active_user_id().await?;
        let mut budget = self
            .budget_store
            .get_budget(&user_id, &command.budget_id)
            .await?
            .ok_or_else(|| {
                anyhow::Error::from(StorageError::not_found("budget", &command.budget_id))
            })?;

        if let Some(category_id) = command.category_id {
            self.require_category(&user_id, &category_id).await?;
            budget.category_id = category_id;
        }
        if let Some(name) = command.name {
            budget.name = name.trim().to_string();
        }
        if let Some(min_goal) = command.min_goal {
            budget.min_goal = min_goal;
        }
        if let Some(max_goal) = command.max_goal {
            budget.max_goal = max_goal;
        }
        if let Some(start_date) = command.start_date {
            budget.start_date = start_date;
        }
        if let Some(end_date) = command.end_date {
            budget.end_date = end_date;
        }
        Self::validate_budget(&budget)?;

        self.budget_store.update_budget(&budget).await?;
        info!("Updated budget {}", budget.id);

        self.progress(budget).await
    }

    pub async fn delete_budget(&self, budget_id: &str) -> Result<()> {
        let user_id = self.active_user_id().await?;
        let deleted = self.budget_store.delete_budget(&user_id, budget_id).await?;
        if !deleted {
            return Err(StorageError::not_found("budget", budget_id).into());
        }
        info!("Deleted budget {}", budget_id);
        Ok(())
    }
}
