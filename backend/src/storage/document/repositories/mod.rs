pub mod budget_repository;
pub mod category_repository;
pub mod transaction_repository;
pub mod user_repository;

pub use budget_repository::DocumentBudgetRepository;
pub use category_repository::DocumentCategoryRepository;
pub use transaction_repository::DocumentTransactionRepository;
pub use user_repository::DocumentUserRepository;
