//! Search, data source and template endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::Result;
use crate::server::{auth::AuthUser, state::AppState};
use crate::types::{
    DataSourceInfo, Document, Page, PageParams, SearchRequest, SearchResponse, Template,
};

/// Query parameters for `GET /api/retrieval/search`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Query parameters for `GET /api/retrieval/documents/:id`
#[derive(Debug, Deserialize)]
pub struct ProviderQuery {
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_limit() -> usize {
    5
}

/// POST /api/retrieval/search - Search across data sources
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    Ok(Json(state.retrieval().search(&request).await?))
}

/// GET /api/retrieval/search - Search a single data source
pub async fn search_source(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Document>>> {
    let documents = state
        .retrieval()
        .search_source(&params.query, &params.provider, params.limit)
        .await?;
    Ok(Json(documents))
}

/// GET /api/retrieval/documents/:id - Get a document from a data source
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ProviderQuery>,
) -> Result<Json<Document>> {
    Ok(Json(
        state.retrieval().get_document(&params.provider, &id).await?,
    ))
}

/// GET /api/retrieval/data_sources - List data sources with pagination
pub async fn list_data_sources(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<DataSourceInfo>>> {
    Ok(Json(state.retrieval().list_data_sources(params)?))
}

/// GET /api/retrieval/templates - List prompt templates
pub async fn list_templates(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Template>>> {
    Ok(Json(state.retrieval().list_templates().await?))
}

/// GET /api/retrieval/templates/:id - Get a prompt template
pub async fn get_template(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Template>> {
    Ok(Json(state.retrieval().get_template(&id).await?))
}
