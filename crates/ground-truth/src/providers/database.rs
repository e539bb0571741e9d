//! Database provider trait for collections, QA pairs and library documents

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CollectionInput, CollectionRecord, Document, LibraryDocument, Metadata, QaPair, QaStatus,
};

/// Field changes applied to a stored QA pair; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct QaPairChanges {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub documents: Option<Vec<Document>>,
    pub status: Option<QaStatus>,
    /// Replaces the stored metadata object
    pub metadata: Option<Metadata>,
}

/// Trait for ground truth storage
///
/// Lookups of a missing collection, QA pair or document fail with the
/// matching not-found error.
///
/// Implementations:
/// - `MemoryDatabase`: seeded in-memory tables
#[async_trait]
pub trait DatabaseProvider: Send + Sync {
    /// List every collection in insertion order
    async fn list_collections(&self) -> Result<Vec<CollectionRecord>>;

    /// Get a collection by ID
    async fn get_collection(&self, id: &str) -> Result<CollectionRecord>;

    /// Store a new collection
    async fn create_collection(&self, collection: CollectionRecord) -> Result<CollectionRecord>;

    /// Replace the editable fields of a collection
    async fn update_collection(&self, id: &str, input: CollectionInput)
        -> Result<CollectionRecord>;

    /// Delete a collection and all of its QA pairs
    ///
    /// Returns the deleted collection and the number of QA pairs removed.
    async fn delete_collection(&self, id: &str) -> Result<(CollectionRecord, usize)>;

    /// List the QA pairs of a collection, optionally only those with `status`
    async fn list_qa_pairs(
        &self,
        collection_id: &str,
        status: Option<QaStatus>,
    ) -> Result<Vec<QaPair>>;

    /// Get a QA pair that must belong to the given collection
    async fn get_qa_pair(&self, collection_id: &str, qa_id: &str) -> Result<QaPair>;

    /// Get a QA pair by ID regardless of collection
    async fn find_qa_pair(&self, qa_id: &str) -> Result<QaPair>;

    /// Store a new QA pair; its collection must exist
    async fn add_qa_pair(&self, pair: QaPair) -> Result<QaPair>;

    /// Apply changes to a QA pair
    async fn update_qa_pair(&self, qa_id: &str, changes: QaPairChanges) -> Result<QaPair>;

    /// Delete a QA pair from a collection
    async fn delete_qa_pair(&self, collection_id: &str, qa_id: &str) -> Result<()>;

    /// List library documents
    async fn list_documents(&self) -> Result<Vec<LibraryDocument>>;

    /// Get a library document by ID
    async fn get_document(&self, id: &str) -> Result<LibraryDocument>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
