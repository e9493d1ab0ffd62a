use axum::{extract::State, Json};
use classboard_core::{
    errors::BoardError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role},
};
use std::sync::Arc;

use crate::{
    middleware::{auth, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "username is required".to_string(),
        )));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "email is required".to_string(),
        )));
    }
    if payload.password.is_empty() {
        return Err(AppError(BoardError::Validation(
            "password is required".to_string(),
        )));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    // The unique constraints on username/email decide the conflict; a
    // None here means another registration got there first.
    let db_user = classboard_db::repositories::user::create_user(
        &state.db_pool,
        payload.username.trim(),
        payload.email.trim(),
        &password_hash,
        payload.role.as_str(),
    )
    .await
    .map_err(BoardError::Database)?
    .ok_or_else(|| BoardError::AlreadyExists("username or email already registered".to_string()))?;

    tracing::info!("Registered user: id={}, role={}", db_user.id, db_user.role);

    let response = RegisterResponse {
        id: db_user.id,
        username: db_user.username,
        email: db_user.email,
        role: payload.role,
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let db_user = classboard_db::repositories::user::get_user_by_email(&state.db_pool, &payload.email)
        .await
        .map_err(BoardError::Database)?;

    // Wrong email and wrong password fail identically.
    let Some(db_user) = db_user else {
        return Err(AppError(BoardError::Unauthenticated));
    };

    if !auth::verify_password(&payload.password, &db_user.password_hash)? {
        return Err(AppError(BoardError::Unauthenticated));
    }

    let role = Role::parse(&db_user.role)
        .ok_or_else(|| BoardError::Validation(format!("unknown role: {}", db_user.role)))?;

    tracing::info!("Login: user_id={}", db_user.id);

    let response = LoginResponse {
        user_id: db_user.id,
        username: db_user.username,
        role,
    };

    Ok(Json(response))
}
