use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use imgpress_core::models::UserResponse;
use imgpress_core::AppError;
use serde::{Deserialize, Serialize};

use crate::auth::middleware::{issue_token, AuthState};
use crate::auth::{hash_password, verify_password};
use crate::error::HttpAppError;
use crate::state::AppState;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// `POST /auth/register`: create an account. The username must be unique;
/// a duplicate comes back as 409.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HttpAppError> {
    let username = request.username.trim();
    if username.len() < MIN_USERNAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        ))
        .into());
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ))
        .into());
    }

    let password_hash = hash_password(&request.password)?;
    let user = state.users.create(username, &password_hash, "user").await?;

    tracing::info!(username = %user.username, "Registered new user");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// `POST /auth/login`: verify credentials and hand out a bearer token.
/// Unknown usernames and wrong passwords produce the same 401.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, HttpAppError> {
    let user = state
        .users
        .find_by_username(request.username.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid username or password".to_string()))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(
            AppError::Unauthorized("invalid username or password".to_string()).into(),
        );
    }

    let auth = AuthState {
        jwt_secret: state.config.jwt_secret.clone(),
        jwt_expiry_hours: state.config.jwt_expiry_hours,
    };
    let token = issue_token(&auth, &user)?;

    tracing::debug!(username = %user.username, "User logged in");
    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}
