//! Backend for the SpendTrack personal finance tracker.
//!
//! Layers, from the outside in:
//! - `io::rest`: axum HTTP handlers and DTO mapping
//! - `domain`: services enforcing the business rules
//! - `storage`: interchangeable persistence backends (SQLite or a document
//!   store with a realtime change feed) behind the traits in
//!   `storage::traits`

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::domain::{BudgetService, CategoryService, TransactionService, UserService};
use crate::io::rest::{auth_apis, budget_apis, category_apis, transaction_apis};
use crate::storage::document::DocumentConnection;
use crate::storage::sqlite::DbConnection;
use crate::storage::traits::{BudgetStore, CategoryStore, TransactionStore, UserStore};

/// Which persistence backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Document,
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_address: String,
    pub storage: StorageBackend,
    /// SQLite database URL; `None` uses the default database file
    pub database_url: Option<String>,
}

impl Config {
    /// Build a config from `SPENDTRACK_BIND`, `SPENDTRACK_STORAGE`, and
    /// `SPENDTRACK_DATABASE_URL`. Unset variables fall back to a local
    /// SQLite setup.
    pub fn from_env() -> Self {
        let bind_address =
            std::env::var("SPENDTRACK_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let storage = match std::env::var("SPENDTRACK_STORAGE").as_deref() {
            Ok("document") => StorageBackend::Document,
            _ => StorageBackend::Sqlite,
        };
        let database_url = std::env::var("SPENDTRACK_DATABASE_URL").ok();

        Self {
            bind_address,
            storage,
            database_url,
        }
    }
}

/// Shared handle to the domain services, cloned into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub category_service: CategoryService,
    pub transaction_service: TransactionService,
    pub budget_service: BudgetService,
}

impl AppState {
    fn from_stores(
        user_store: Arc<dyn UserStore>,
        category_store: Arc<dyn CategoryStore>,
        transaction_store: Arc<dyn TransactionStore>,
        budget_store: Arc<dyn BudgetStore>,
    ) -> Self {
        Self {
            user_service: UserService::new(user_store.clone()),
            category_service: CategoryService::new(category_store.clone(), user_store.clone()),
            transaction_service: TransactionService::new(
                transaction_store.clone(),
                category_store.clone(),
                user_store.clone(),
            ),
            budget_service: BudgetService::new(
                budget_store,
                transaction_store,
                category_store,
                user_store,
            ),
        }
    }
}

/// Initialize the configured storage backend and build the service layer.
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    match config.storage {
        StorageBackend::Sqlite => {
            let db = match &config.database_url {
                Some(url) => DbConnection::new(url).await?,
                None => DbConnection::init().await?,
            };
            info!("Storage backend: sqlite");

            use crate::storage::sqlite::repositories::{
                BudgetRepository, CategoryRepository, TransactionRepository, UserRepository,
            };
            Ok(AppState::from_stores(
                Arc::new(UserRepository::new(db.clone())),
                Arc::new(CategoryRepository::new(db.clone())),
                Arc::new(TransactionRepository::new(db.clone())),
                Arc::new(BudgetRepository::new(db)),
            ))
        }
        StorageBackend::Document => {
            let store = DocumentConnection::new_default()?;
            info!("Storage backend: document");
            spawn_change_feed_logger(&store);

            use crate::storage::document::repositories::{
                DocumentBudgetRepository, DocumentCategoryRepository,
                DocumentTransactionRepository, DocumentUserRepository,
            };
            Ok(AppState::from_stores(
                Arc::new(DocumentUserRepository::new(store.clone())),
                Arc::new(DocumentCategoryRepository::new(store.clone())),
                Arc::new(DocumentTransactionRepository::new(store.clone())),
                Arc::new(DocumentBudgetRepository::new(store)),
            ))
        }
    }
}

/// Follow the document store's change feed and log every event.
fn spawn_change_feed_logger(store: &DocumentConnection) {
    let mut events = store.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    debug!(
                        "Change: {:?} {:?}/{} (user {})",
                        event.kind,
                        event.collection,
                        event.document_id,
                        event.user_id
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Change feed lagged; skipped {} event(s)", skipped);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Build the HTTP router over the given application state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth_apis::register))
        .route("/api/auth/login", post(auth_apis::login))
        .route("/api/auth/logout", post(auth_apis::logout))
        .route("/api/auth/me", get(auth_apis::active_user))
        .route("/api/users/:user_id", get(auth_apis::get_user))
        .route(
            "/api/categories",
            get(category_apis::list_categories).post(category_apis::create_category),
        )
        .route(
            "/api/categories/:category_id",
            get(category_apis::get_category)
                .put(category_apis::update_category)
                .delete(category_apis::delete_category),
        )
        .route(
            "/api/transactions",
            get(transaction_apis::list_transactions)
                .post(transaction_apis::create_transaction)
                .delete(transaction_apis::delete_transactions),
        )
        .route(
            "/api/transactions/limits",
            get(transaction_apis::transaction_limits),
        )
        .route(
            "/api/transactions/:transaction_id",
            get(transaction_apis::get_transaction)
                .put(transaction_apis::update_transaction)
                .delete(transaction_apis::delete_transaction),
        )
        .route(
            "/api/budgets",
            get(budget_apis::list_budgets).post(budget_apis::create_budget),
        )
        .route(
            "/api/budgets/:budget_id",
            get(budget_apis::get_budget)
                .put(budget_apis::update_budget)
                .delete(budget_apis::delete_budget),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
