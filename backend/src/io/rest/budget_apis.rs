//! # REST API for Budgets
//!
//! Every budget returned here carries its derived `current_amount`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use tracing::info;

use crate::domain::commands::budgets::{CreateBudgetCommand, UpdateBudgetCommand};
use crate::io::rest::{error_response, mappers};
use crate::AppState;
use shared::{BudgetListResponse, BudgetResponse, CreateBudgetRequest, UpdateBudgetRequest};

fn parse_calendar_date(value: &str) -> Result<NaiveDate, Response> {
    value.parse::<NaiveDate>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid date '{}'; expected YYYY-MM-DD", value),
        )
            .into_response()
    })
}

/// List the active user's budgets with their spending progress
pub async fn list_budgets(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/budgets");

    match state.budget_service.list_budgets().await {
        Ok(budgets) => (
            StatusCode::OK,
            Json(BudgetListResponse {
                budgets: budgets.iter().map(mappers::budget_to_dto).collect(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error listing budgets"),
    }
}

/// Create a new budget
pub async fn create_budget(
    State(state): State<AppState>,
    Json(request): Json<CreateBudgetRequest>,
) -> Response {
    info!("POST /api/budgets - name: {}", request.name);

    let start_date = match parse_calendar_date(&request.start_date) {
        Ok(date) => date,
        Err(response) => return response,
    };
    let end_date = match parse_calendar_date(&request.end_date) {
        Ok(date) => date,
        Err(response) => return response,
    };

    let command = CreateBudgetCommand {
        category_id: request.category_id,
        name: request.name,
        min_goal: request.min_goal,
        max_goal: request.max_goal,
        start_date,
        end_date,
    };
    match state.budget_service.create_budget(command).await {
        Ok(progress) => (
            StatusCode::CREATED,
            Json(BudgetResponse {
                success_message: format!("Created budget '{}'", progress.budget.name),
                budget: mappers::budget_to_dto(&progress),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error creating budget"),
    }
}

/// Fetch a single budget with its spending progress
pub async fn get_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}", budget_id);

    match state.budget_service.get_budget(&budget_id).await {
        Ok(progress) => (StatusCode::OK, Json(mappers::budget_to_dto(&progress))).into_response(),
        Err(e) => error_response(e, "Error fetching budget"),
    }
}

/// Update a budget; absent fields keep their current value
pub async fn update_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<UpdateBudgetRequest>,
) -> Response {
    info!("PUT /api/budgets/{}", budget_id);

    let start_date = match request.start_date.as_deref().map(parse_calendar_date) {
        Some(Ok(date)) => Some(date),
        Some(Err(response)) => return response,
        None => None,
    };
    let end_date = match request.end_date.as_deref().map(parse_calendar_date) {
        Some(Ok(date)) => Some(date),
        Some(Err(response)) => return response,
        None => None,
    };

    let command = UpdateBudgetCommand {
        budget_id,
        category_id: request.category_id,
        name: request.name,
        min_goal: request.min_goal,
        max_goal: request.max_goal,
        start_date,
        end_date,
    };
    match state.budget_service.update_budget(command).await {
        Ok(progress) => (
            StatusCode::OK,
            Json(BudgetResponse {
                success_message: format!("Updated budget '{}'", progress.budget.name),
                budget: mappers::budget_to_dto(&progress),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error updating budget"),
    }
}

/// Delete a budget
pub async fn delete_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}", budget_id);

    match state.budget_service.delete_budget(&budget_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "Error deleting budget"),
    }
}
