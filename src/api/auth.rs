//! Admin authentication: password login backed by server-side sessions,
//! plus an API key for non-browser clients.

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};

const SESSION_USER_KEY: &str = "user";
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Key sources accepted for non-session requests, in precedence order.
fn header_api_key(headers: &HeaderMap) -> Option<String> {
    let direct = headers
        .get("X-Api-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if direct.is_some() {
        return direct;
    }

    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Resolve the acting admin for a request, or None when nothing checks out.
async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    session: &Session,
) -> Option<String> {
    if let Ok(Some(username)) = session.get::<String>(SESSION_USER_KEY).await {
        return Some(username);
    }

    let key = header_api_key(headers)?;
    match state.store().verify_api_key(&key).await {
        Ok(user) => user.map(|u| u.username),
        Err(e) => {
            tracing::error!("API key verification failed: {e}");
            None
        }
    }
}

/// Gate for the admin router: session cookie, then X-Api-Key, then a
/// bearer token.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, &headers, &session).await {
        Some(username) => {
            tracing::Span::current().record("user_id", &username);
            next.run(request).await
        }
        None => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let accepted = state
        .store()
        .verify_user_password(&payload.username, &payload.password)
        .await?;
    if !accepted {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user = state
        .store()
        .get_user_by_username(&payload.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    session
        .insert(SESSION_USER_KEY, &user.username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("Admin login: {}", user.username);
    Ok(Json(ApiResponse::success(LoginResponse {
        username: user.username,
        api_key: user.api_key,
    })))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let username = session_username(&session).await?;

    if payload.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if payload.current_password == payload.new_password {
        return Err(ApiError::validation(
            "New password must be different from current password",
        ));
    }

    let accepted = state
        .store()
        .verify_user_password(&username, &payload.current_password)
        .await?;
    if !accepted {
        return Err(ApiError::validation("Current password is incorrect"));
    }

    state
        .store()
        .update_user_password(&username, &payload.new_password)
        .await?;
    tracing::info!("Password changed for user: {username}");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated".to_string(),
    })))
}

/// POST /auth/api-key/regenerate
///
/// Replaces the admin API key; the old key stops working immediately.
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let username = session_username(&session).await?;

    let api_key = state.store().regenerate_api_key(&username).await?;
    tracing::info!("API key regenerated for user: {username}");

    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}

async fn session_username(session: &Session) -> Result<String, ApiError> {
    session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
}
