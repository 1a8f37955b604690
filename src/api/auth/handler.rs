//! Auth API handlers
//!
//! Registration and login. Both respond with a token plus the public user
//! projection; the stored password hash never leaves the process.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{User, UserInfo};
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/register - create an account and log it in
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let msgs = state.messages();

    let email = payload.email.trim().to_string();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation(msgs.credentials_required));
    }
    if !email.contains('@') {
        return Err(AppError::validation(msgs.invalid_email));
    }
    validate_required_text(&email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;

    let password_hash = User::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let user = User {
        id: None,
        email: email.clone(),
        name: payload.name.unwrap_or_default().trim().to_string(),
        password_hash,
        is_admin: false,
        created_at: Utc::now(),
    };

    let repo = UserRepository::new(state.get_db(), state.config.db_timeout());
    let created = match repo.create(user).await {
        Ok(created) => created,
        Err(RepoError::Duplicate(_)) => return Err(AppError::conflict(msgs.email_taken)),
        Err(e) => return Err(e.into()),
    };

    let token = state
        .jwt_service
        .generate_token(&created.id_string(), &created.email, created.is_admin)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(email = %created.email, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserInfo::from(&created),
        }),
    ))
}

/// POST /api/login - verify credentials and issue a token
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let msgs = state.messages();

    let email = payload.email.trim().to_string();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation(msgs.credentials_required));
    }

    let repo = UserRepository::new(state.get_db(), state.config.db_timeout());
    let user = repo.find_by_email(&email).await?;

    // Fixed delay before revealing the result, so "no such account" and
    // "wrong password" are indistinguishable by response time
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) => user,
        None => {
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::unauthorized_msg(msgs.invalid_credentials));
        }
    };

    let password_valid = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(email = %email, "Login failed - invalid credentials");
        return Err(AppError::unauthorized_msg(msgs.invalid_credentials));
    }

    let token = state
        .jwt_service
        .generate_token(&user.id_string(), &user.email, user.is_admin)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(email = %user.email, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: UserInfo::from(&user),
    }))
}
