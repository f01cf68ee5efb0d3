//! # REST API for Authentication
//!
//! Registration, login, logout, and the active-user lookup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::domain::commands::auth::{LoginCommand, RegisterCommand};
use crate::io::rest::{error_response, mappers};
use crate::AppState;
use shared::{
    ActiveUserResponse, LoginRequest, LoginResponse, LogoutResponse, RegisterRequest,
    RegisterResponse,
};

/// Create a new account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/register - username: {}", request.username);

    let command = RegisterCommand {
        username: request.username,
        password: request.password,
    };
    match state.user_service.register(command).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                success_message: format!("Welcome, {}!", user.username),
                user: mappers::user_to_dto(&user),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error registering user"),
    }
}

/// Log in. Bad credentials yield a 200 with no user rather than an error.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - username: {}", request.username);

    let command = LoginCommand {
        username: request.username,
        password: request.password,
    };
    match state.user_service.login(command).await {
        Ok(user) => (
            StatusCode::OK,
            Json(LoginResponse {
                user: user.as_ref().map(mappers::user_to_dto),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error logging in"),
    }
}

/// Log out the active user
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/auth/logout");

    match state.user_service.logout().await {
        Ok(()) => (
            StatusCode::OK,
            Json(LogoutResponse {
                success_message: "Logged out".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error logging out"),
    }
}

/// The currently logged-in user, if any
pub async fn active_user(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/auth/me");

    match state.user_service.get_active_user().await {
        Ok(user) => (
            StatusCode::OK,
            Json(ActiveUserResponse {
                active_user: user.as_ref().map(mappers::user_to_dto),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error fetching active user"),
    }
}

/// Look up a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}", user_id);

    match state.user_service.get_user(&user_id).await {
        Ok(user) => (StatusCode::OK, Json(mappers::user_to_dto(&user))).into_response(),
        Err(e) => error_response(e, "Error fetching user"),
    }
}
