//! Domain layer: business rules, validation, and orchestration between the
//! REST surface and the storage backends.

pub mod budget_service;
pub mod category_service;
pub mod commands;
pub mod models;
pub mod transaction_service;
pub mod user_service;

pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use transaction_service::TransactionService;
pub use user_service::UserService;

use thiserror::Error;

/// Errors raised by the domain services themselves, as opposed to storage
/// failures. The REST layer maps these to client-error status codes.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("No user is logged in")]
    NotLoggedIn,
}
