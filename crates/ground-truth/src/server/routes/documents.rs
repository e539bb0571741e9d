//! Library document endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::LibraryDocument;

/// GET /api/documents - List library documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<LibraryDocument>>> {
    Ok(Json(state.database().list_documents().await?))
}

/// GET /api/documents/:id - Get a library document
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LibraryDocument>> {
    Ok(Json(state.database().get_document(&id).await?))
}
