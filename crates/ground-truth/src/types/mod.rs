//! Core types for the ground truth backend

pub mod auth;
pub mod collection;
pub mod document;
pub mod generation;
pub mod qa_pair;
pub mod retrieval;
pub mod template;

pub use auth::{Claims, LoginRequest, RegisterRequest, TokenResponse, User};
pub use collection::{Collection, CollectionInput, CollectionRecord};
pub use document::{Document, DocumentSource, LibraryDocument};
pub use generation::{
    Generation, GenerationOptions, GenerationRequest, GenerationResponse, ModelInfo, TokenUsage,
};
pub use qa_pair::{QaPair, QaPairCreate, QaPairUpdate, QaStatus};
pub use retrieval::{
    DataSourceInfo, Page, PageParams, Pagination, SearchRequest, SearchResponse,
};
pub use template::Template;

/// Free-form JSON object attached to collections, QA pairs and documents
pub type Metadata = serde_json::Map<String, serde_json::Value>;
