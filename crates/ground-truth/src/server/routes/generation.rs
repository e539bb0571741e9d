//! Answer generation endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{GenerationRequest, GenerationResponse, ModelInfo};

/// POST /api/generation/generate - Generate an answer
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationResponse>> {
    Ok(Json(state.generation().generate(&request).await?))
}

/// GET /api/generation/models - Models of the active generator
pub async fn list_models(State(state): State<AppState>) -> Json<Vec<ModelInfo>> {
    Json(state.generation().available_models())
}
