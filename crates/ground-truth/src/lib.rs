//! ground-truth: backend for curating question/answer ground truth
//!
//! Collections of QA pairs go through a review workflow (ready for review,
//! approved, revision requested, rejected). Storage, authentication, document
//! retrieval and answer generation sit behind provider traits; the shipped
//! implementations are in-memory stubs for local development.

pub mod collections;
pub mod config;
pub mod error;
pub mod generation;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod store;
pub mod types;

pub use collections::CollectionService;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use generation::GenerationManager;
pub use providers::ProviderRegistry;
pub use retrieval::RetrievalService;
pub use server::GroundTruthServer;
pub use store::MemoryStore;
pub use types::{Collection, Document, QaPair, QaStatus, User};
