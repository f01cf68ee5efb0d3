//! # REST API Interface Layer
//!
//! HTTP endpoints for the finance tracker. This layer handles request and
//! response serialization, translation from domain errors to HTTP status
//! codes, and request logging; business logic stays in the domain services.

pub mod auth_apis;
pub mod budget_apis;
pub mod category_apis;
pub mod mappers;
pub mod transaction_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Map a failure from the domain or storage layer to an HTTP response.
pub(crate) fn error_response(error: anyhow::Error, context: &str) -> Response {
    if let Some(domain_error) = error.downcast_ref::<DomainError>() {
        let status = match domain_error {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotLoggedIn => StatusCode::UNAUTHORIZED,
        };
        return (status, domain_error.to_string()).into_response();
    }
    if let Some(storage_error) = error.downcast_ref::<StorageError>() {
        let status = match storage_error {
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            StorageError::Conflict(_) => StatusCode::CONFLICT,
        };
        return (status, storage_error.to_string()).into_response();
    }

    error!("{}: {}", context, error);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", context)).into_response()
}
