//! Collection and QA pair endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::Result;
use crate::server::{auth::AuthUser, state::AppState};
use crate::types::{
    qa_pair::ANONYMOUS_USER, Collection, CollectionInput, QaPair, QaPairCreate, QaPairUpdate,
};

/// Query parameters for listing QA pairs
#[derive(Debug, Deserialize)]
pub struct QaPairQuery {
    /// Only pairs with this status
    pub status: Option<String>,
}

/// GET /api/collections - List all collections with statistics
pub async fn list_collections(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    Ok(Json(state.collections().list_collections().await?))
}

/// POST /api/collections - Create a collection
pub async fn create_collection(
    State(state): State<AppState>,
    Json(input): Json<CollectionInput>,
) -> Result<(StatusCode, Json<Collection>)> {
    let collection = state.collections().create_collection(input).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

/// GET /api/collections/:id - Get a collection
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Collection>> {
    Ok(Json(state.collections().get_collection(&id).await?))
}

/// PUT /api/collections/:id - Replace a collection's fields
pub async fn update_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CollectionInput>,
) -> Result<Json<Collection>> {
    Ok(Json(state.collections().update_collection(&id, input).await?))
}

/// DELETE /api/collections/:id - Delete a collection and its QA pairs
pub async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.collections().delete_collection(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/collections/:id/qa-pairs - List QA pairs of a collection
pub async fn list_qa_pairs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<QaPairQuery>,
) -> Result<Json<Vec<QaPair>>> {
    let pairs = state
        .collections()
        .list_qa_pairs(&id, query.status.as_deref())
        .await?;
    Ok(Json(pairs))
}

/// POST /api/collections/:id/qa-pairs - Add a QA pair
///
/// The pair is attributed to the caller when a valid token is sent.
pub async fn create_qa_pair(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<AuthUser>,
    Json(create): Json<QaPairCreate>,
) -> Result<(StatusCode, Json<QaPair>)> {
    let created_by = user
        .as_ref()
        .map_or(ANONYMOUS_USER, |AuthUser(user)| user.id.as_str());
    let pair = state
        .collections()
        .create_qa_pair(&id, create, created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

/// DELETE /api/collections/:id/qa-pairs/:qa_id - Remove a QA pair
pub async fn delete_qa_pair(
    State(state): State<AppState>,
    Path((id, qa_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    state.collections().delete_qa_pair(&id, &qa_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/collections/qa-pairs/:qa_id - Get a QA pair
pub async fn get_qa_pair(
    State(state): State<AppState>,
    Path(qa_id): Path<String>,
) -> Result<Json<QaPair>> {
    Ok(Json(state.collections().get_qa_pair(&qa_id).await?))
}

/// PATCH /api/collections/qa-pairs/:qa_id - Partially update a QA pair
pub async fn update_qa_pair(
    State(state): State<AppState>,
    Path(qa_id): Path<String>,
    Json(update): Json<QaPairUpdate>,
) -> Result<Json<QaPair>> {
    Ok(Json(state.collections().update_qa_pair(&qa_id, update).await?))
}
