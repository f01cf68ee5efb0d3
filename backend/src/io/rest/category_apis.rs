//! # REST API for Categories

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::domain::commands::categories::{CreateCategoryCommand, UpdateCategoryCommand};
use crate::io::rest::{error_response, mappers};
use crate::AppState;
use shared::{
    CategoryListResponse, CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest,
};

/// List the active user's categories, ordered by name
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");

    match state.category_service.list_categories().await {
        Ok(categories) => (
            StatusCode::OK,
            Json(CategoryListResponse {
                categories: categories.iter().map(mappers::category_to_dto).collect(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error listing categories"),
    }
}

/// Create a new category
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/categories - name: {}", request.name);

    let command = CreateCategoryCommand {
        name: request.name,
        color: request.color,
        icon: request.icon,
    };
    match state.category_service.create_category(command).await {
        Ok(category) => (
            StatusCode::CREATED,
            Json(CategoryResponse {
                success_message: format!("Created category '{}'", category.name),
                category: mappers::category_to_dto(&category),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error creating category"),
    }
}

/// Fetch a single category
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/categories/{}", category_id);

    match state.category_service.get_category(&category_id).await {
        Ok(category) => (StatusCode::OK, Json(mappers::category_to_dto(&category))).into_response(),
        Err(e) => error_response(e, "Error fetching category"),
    }
}

/// Update a category; absent fields keep their current value
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/categories/{}", category_id);

    let command = UpdateCategoryCommand {
        category_id,
        name: request.name,
        color: request.color,
        icon: request.icon,
    };
    match state.category_service.update_category(command).await {
        Ok(category) => (
            StatusCode::OK,
            Json(CategoryResponse {
                success_message: format!("Updated category '{}'", category.name),
                category: mappers::category_to_dto(&category),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error updating category"),
    }
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/categories/{}", category_id);

    match state.category_service.delete_category(&category_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "Error deleting category"),
    }
}
