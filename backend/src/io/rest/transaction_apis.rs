//! # REST API for Transactions
//!
//! Endpoints for recording, listing, updating, and deleting transactions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::domain::commands::transactions::{
    CreateTransactionCommand, DeleteTransactionsCommand, TransactionListQuery,
    UpdateTransactionCommand,
};
use crate::io::rest::{error_response, mappers};
use crate::AppState;
use shared::{
    CreateTransactionRequest, DeleteTransactionsRequest, DeleteTransactionsResponse,
    TransactionListResponse, TransactionResponse, UpdateTransactionRequest,
};

/// Query parameters for the transaction listing API
#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    pub after: Option<String>,
    pub limit: Option<u32>,
    pub category_id: Option<String>,
    /// "income" or "expense"
    pub transaction_type: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub start_date: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub end_date: Option<String>,
}

fn parse_calendar_date(value: &str) -> Result<NaiveDate, Response> {
    value.parse::<NaiveDate>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid date '{}'; expected YYYY-MM-DD", value),
        )
            .into_response()
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Response> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid timestamp '{}'; expected RFC 3339", value),
            )
                .into_response()
        })
}

/// List transactions with optional filtering and cursor pagination
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionListParams>,
) -> Response {
    info!("GET /api/transactions - params: {:?}", params);

    let transaction_type = match params.transaction_type.as_deref() {
        Some(value) => match shared::TransactionType::parse(value) {
            Some(t) => Some(mappers::transaction_type_from_dto(t)),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid transaction type '{}'", value),
                )
                    .into_response()
            }
        },
        None => None,
    };
    let start_date = match params.start_date.as_deref().map(parse_calendar_date) {
        Some(Ok(date)) => Some(date),
        Some(Err(response)) => return response,
        None => None,
    };
    let end_date = match params.end_date.as_deref().map(parse_calendar_date) {
        Some(Ok(date)) => Some(date),
        Some(Err(response)) => return response,
        None => None,
    };

    let query = TransactionListQuery {
        after: params.after,
        limit: params.limit,
        category_id: params.category_id,
        transaction_type,
        start_date,
        end_date,
    };
    match state.transaction_service.list_transactions(query).await {
        Ok(result) => (
            StatusCode::OK,
            Json(TransactionListResponse {
                transactions: result
                    .transactions
                    .iter()
                    .map(mappers::transaction_to_dto)
                    .collect(),
                pagination: shared::PaginationInfo {
                    has_more: result.pagination.has_more,
                    next_cursor: result.pagination.next_cursor,
                },
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error listing transactions"),
    }
}

/// Record a new transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Response {
    info!("POST /api/transactions - request: {:?}", request);

    let date = match request.date.as_deref().map(parse_timestamp) {
        Some(Ok(date)) => Some(date),
        Some(Err(response)) => return response,
        None => None,
    };

    let command = CreateTransactionCommand {
        category_id: request.category_id,
        amount: request.amount,
        transaction_type: mappers::transaction_type_from_dto(request.transaction_type),
        date,
        note: request.note,
    };
    match state.transaction_service.create_transaction(command).await {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(TransactionResponse {
                success_message: "Transaction recorded".to_string(),
                transaction: mappers::transaction_to_dto(&transaction),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error creating transaction"),
    }
}

/// Fetch a single transaction
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/transactions/{}", transaction_id);

    match state.transaction_service.get_transaction(&transaction_id).await {
        Ok(transaction) => {
            (StatusCode::OK, Json(mappers::transaction_to_dto(&transaction))).into_response()
        }
        Err(e) => error_response(e, "Error fetching transaction"),
    }
}

/// Update a transaction; absent fields keep their current value
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Response {
    info!("PUT /api/transactions/{}", transaction_id);

    let date = match request.date.as_deref().map(parse_timestamp) {
        Some(Ok(date)) => Some(date),
        Some(Err(response)) => return response,
        None => None,
    };

    let command = UpdateTransactionCommand {
        transaction_id,
        category_id: request.category_id,
        amount: request.amount,
        transaction_type: request
            .transaction_type
            .map(mappers::transaction_type_from_dto),
        date,
        note: request.note,
    };
    match state.transaction_service.update_transaction(command).await {
        Ok(transaction) => (
            StatusCode::OK,
            Json(TransactionResponse {
                success_message: "Transaction updated".to_string(),
                transaction: mappers::transaction_to_dto(&transaction),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error updating transaction"),
    }
}

/// Delete a single transaction
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/transactions/{}", transaction_id);

    match state.transaction_service.delete_transaction(&transaction_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "Error deleting transaction"),
    }
}

/// Delete multiple transactions in one request
pub async fn delete_transactions(
    State(state): State<AppState>,
    Json(request): Json<DeleteTransactionsRequest>,
) -> impl IntoResponse {
    info!(
        "DELETE /api/transactions - {} id(s)",
        request.transaction_ids.len()
    );

    let command = DeleteTransactionsCommand {
        transaction_ids: request.transaction_ids,
    };
    match state.transaction_service.delete_transactions(command).await {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteTransactionsResponse {
                deleted_count: result.deleted_count,
                success_message: result.success_message,
                not_found_ids: result.not_found_ids,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error deleting transactions"),
    }
}

/// Form limits for clients
pub async fn transaction_limits(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(state.transaction_service.transaction_limits()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_category, login_test_user, sqlite_test_state};
    use axum::response::IntoResponse;

    fn create_request(category_id: &str, amount: f64) -> CreateTransactionRequest {
        CreateTransactionRequest {
            category_id: category_id.to_string(),
            amount,
            transaction_type: shared::TransactionType::Expense,
            date: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_create_transaction_handler() {
        let state = sqlite_test_state().await;
        login_test_user(&state).await;
        let category_id = create_test_category(&state).await;

        let response = create_transaction(State(state), Json(create_request(&category_id, 25.0)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_amount() {
        let state = sqlite_test_state().await;
        login_test_user(&state).await;
        let category_id = create_test_category(&state).await;

        let response = create_transaction(State(state), Json(create_request(&category_id, -5.0)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_timestamp() {
        let state = sqlite_test_state().await;
        login_test_user(&state).await;
        let category_id = create_test_category(&state).await;

        let mut request = create_request(&category_id, 10.0);
        request.date = Some("june 5th".to_string());
        let response = create_transaction(State(state), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_filters() {
        let state = sqlite_test_state().await;
        login_test_user(&state).await;

        let params = TransactionListParams {
            after: None,
            limit: None,
            category_id: None,
            transaction_type: Some("transfer".to_string()),
            start_date: None,
            end_date: None,
        };
        let response = list_transactions(State(state.clone()), Query(params))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let params = TransactionListParams {
            after: None,
            limit: None,
            category_id: None,
            transaction_type: None,
            start_date: Some("05/06/2025".to_string()),
            end_date: None,
        };
        let response = list_transactions(State(state), Query(params))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_missing_transaction_is_not_found() {
        let state = sqlite_test_state().await;
        login_test_user(&state).await;

        let response = delete_transaction(State(state), Path("ex-0-dead".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transaction_limits_handler() {
        let state = sqlite_test_state().await;
        let response = transaction_limits(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
