//! Translation between domain models and the DTOs in `shared`.
//!
//! The credential never crosses this boundary; `shared::User` has no
//! password field.

use crate::domain::models::budget::BudgetProgress;
use crate::domain::models::category::Category;
use crate::domain::models::transaction::{Transaction, TransactionType};
use crate::domain::models::user::User;

pub fn user_to_dto(user: &User) -> shared::User {
    shared::User {
        id: user.id.clone(),
        username: user.username.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

pub fn category_to_dto(category: &Category) -> shared::Category {
    shared::Category {
        id: category.id.clone(),
        user_id: category.user_id.clone(),
        name: category.name.clone(),
        color: category.color,
        icon: category.icon.clone(),
    }
}

pub fn transaction_type_to_dto(transaction_type: TransactionType) -> shared::TransactionType {
    match transaction_type {
        TransactionType::Income => shared::TransactionType::Income,
        TransactionType::Expense => shared::TransactionType::Expense,
    }
}

pub fn transaction_type_from_dto(transaction_type: shared::TransactionType) -> TransactionType {
    match transaction_type {
        shared::TransactionType::Income => TransactionType::Income,
        shared::TransactionType::Expense => TransactionType::Expense,
    }
}

pub fn transaction_to_dto(transaction: &Transaction) -> shared::Transaction {
    shared::Transaction {
        id: transaction.id.clone(),
        user_id: transaction.user_id.clone(),
        category_id: transaction.category_id.clone(),
        amount: transaction.amount,
        transaction_type: transaction_type_to_dto(transaction.transaction_type),
        date: transaction.date.to_rfc3339(),
        note: transaction.note.clone(),
    }
}

pub fn budget_to_dto(progress: &BudgetProgress) -> shared::Budget {
    shared::Budget {
        id: progress.budget.id.clone(),
        user_id: progress.budget.user_id.clone(),
        category_id: progress.budget.category_id.clone(),
        name: progress.budget.name.clone(),
        min_goal: progress.budget.min_goal,
        max_goal: progress.budget.max_goal,
        start_date: progress.budget.start_date.to_string(),
        end_date: progress.budget.end_date.to_string(),
        current_amount: progress.current_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::budget::Budget;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_user_dto_has_no_credential() {
        let user = User {
            id: "user-1-aaaa".to_string(),
            username: "alice".to_string(),
            password: "Password1!".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap(),
        };
        let dto = user_to_dto(&user);
        assert_eq!(dto.id, "user-1-aaaa");
        assert_eq!(dto.created_at, "2025-06-01T09:30:00+00:00");
        // Compile-time guarantee really; the DTO simply has no such field
        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("Password1!"));
    }

    #[test]
    fn test_budget_dto_formats_dates_as_iso() {
        let progress = BudgetProgress {
            budget: Budget {
                id: "budget-1-aaaa".to_string(),
                user_id: "user-1-aaaa".to_string(),
                category_id: "cat-1-aaaa".to_string(),
                name: "Groceries".to_string(),
                min_goal: 100.0,
                max_goal: 400.0,
                start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            },
            current_amount: 52.5,
        };
        let dto = budget_to_dto(&progress);
        assert_eq!(dto.start_date, "2025-06-01");
        assert_eq!(dto.end_date, "2025-06-30");
        assert_eq!(dto.current_amount, 52.5);
    }
}
