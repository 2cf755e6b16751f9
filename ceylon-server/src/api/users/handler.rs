//! User API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::models::{Role, User};

use crate::api::form::JsonBody;
use crate::auth::{CurrentUser, hash_password, verify_dummy, verify_password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// POST /api/users/register - always creates a customer account
pub async fn register(
    State(state): State<ServerState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    let req = req.normalized();
    shared::validation::check(&req)?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let created = user::create(
        state.pool(),
        &user::NewUser {
            name: &req.name,
            email: &req.email,
            password_hash: &password_hash,
            phone: &req.phone,
            country: &req.country,
            role: Role::Customer,
        },
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmailAlreadyRegistered, msg),
        other => other.into(),
    })?;

    tracing::info!(user_id = created.id, "User registered");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<ServerState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim().to_lowercase();

    let found = user::find_by_email(state.pool(), &email).await?;
    let verified = match found {
        Some((user, hash)) => verify_password(&req.password, &hash).then_some(user),
        None => {
            verify_dummy(&req.password);
            None
        }
    };
    let user = match verified {
        Some(user) => user,
        None => {
            security_log!("WARN", "login_failed", email = email.as_str());
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service()
        .generate_token(user.id, &user.email, user.role)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(Json(LoginResponse {
        token,
        role: user.role,
        user: user.into(),
    }))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let user = user::find_by_id(state.pool(), current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user))
}
