//! API routes for the ground truth server

pub mod auth;
pub mod collections;
pub mod documents;
pub mod generation;
pub mod retrieval;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        .route("/auth/providers", get(auth::providers))
        // Collections
        .route(
            "/collections",
            get(collections::list_collections).post(collections::create_collection),
        )
        .route(
            "/collections/qa-pairs/:qa_id",
            get(collections::get_qa_pair).patch(collections::update_qa_pair),
        )
        .route(
            "/collections/:id",
            get(collections::get_collection)
                .put(collections::update_collection)
                .delete(collections::delete_collection),
        )
        .route(
            "/collections/:id/qa-pairs",
            get(collections::list_qa_pairs).post(collections::create_qa_pair),
        )
        .route(
            "/collections/:id/qa-pairs/:qa_id",
            delete(collections::delete_qa_pair),
        )
        // Library documents
        .route("/documents", get(documents::list_documents))
        .route("/documents/:id", get(documents::get_document))
        // Retrieval
        .route(
            "/retrieval/search",
            post(retrieval::search).get(retrieval::search_source),
        )
        .route("/retrieval/documents/:id", get(retrieval::get_document))
        .route("/retrieval/data_sources", get(retrieval::list_data_sources))
        .route("/retrieval/templates", get(retrieval::list_templates))
        .route("/retrieval/templates/:id", get(retrieval::get_template))
        // Generation
        .route("/generation/generate", post(generation::generate))
        .route("/generation/models", get(generation::list_models))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "ground-truth",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Ground truth Q&A curation backend",
        "providers": {
            "database": state.database().name(),
            "auth": state.auth().name(),
            "generation": state.generation().provider_name(),
            "data_sources": state.providers().data_source_ids(),
        },
        "endpoints": {
            "POST /api/auth/login": "Exchange credentials for an access token",
            "POST /api/auth/register": "Create an account",
            "GET /api/auth/me": "Current user (bearer token)",
            "GET /api/collections": "List collections with statistics",
            "POST /api/collections": "Create a collection",
            "GET|PUT|DELETE /api/collections/:id": "Read, replace or delete a collection",
            "GET|POST /api/collections/:id/qa-pairs": "List or add QA pairs",
            "DELETE /api/collections/:id/qa-pairs/:qa_id": "Remove a QA pair",
            "GET|PATCH /api/collections/qa-pairs/:qa_id": "Read or update a QA pair",
            "GET /api/documents": "List library documents",
            "POST /api/retrieval/search": "Search across data sources",
            "GET /api/retrieval/search": "Search one data source (bearer token)",
            "GET /api/retrieval/data_sources": "List data sources",
            "GET /api/retrieval/templates": "List prompt templates (bearer token)",
            "POST /api/generation/generate": "Generate an answer",
            "GET /api/generation/models": "List generation models"
        }
    }))
}
