//! Data source provider trait for document retrieval

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DataSourceInfo, Document, Metadata};

/// Field filters for retrieval
///
/// Keys prefixed with `metadata.` match against document metadata, other
/// keys against top-level document fields.
pub type SourceFilters = Metadata;

/// Trait for searchable document sources
///
/// Implementations:
/// - `MemoryDataSource`: fixed sample documents with keyword scoring
#[async_trait]
pub trait DataSourceProvider: Send + Sync {
    /// Unique identifier used in requests
    fn id(&self) -> &str;

    /// User-facing name
    fn name(&self) -> &str;

    /// Short description
    fn description(&self) -> &str;

    /// Ranked documents for a query, best first, at most `limit`
    async fn retrieve_documents(
        &self,
        query: &str,
        filters: &SourceFilters,
        limit: usize,
    ) -> Result<Vec<Document>>;

    /// Get a document by ID
    async fn get_document(&self, id: &str) -> Result<Document>;

    /// Listing entry for this source
    fn info(&self) -> DataSourceInfo {
        DataSourceInfo {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}
