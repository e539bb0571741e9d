//! Login, registration and current-user endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::error::Result;
use crate::server::{auth::AuthUser, state::AppState};
use crate::types::{LoginRequest, RegisterRequest, TokenResponse, User};

/// POST /api/auth/login - Exchange credentials for an access token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let token = state
        .auth()
        .authenticate(&request.username, &request.password)
        .await?;
    Ok(Json(token))
}

/// POST /api/auth/register - Create an account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.auth().register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/auth/me - The authenticated user
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// GET /api/auth/providers - Active and available auth providers
pub async fn providers(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "current": state.auth().name(),
        "available": ["simple"],
    }))
}
