//! Database provider backed by the in-memory store

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::store::{Filter, MemoryStore, Record, COLLECTIONS, DOCUMENTS, QA_PAIRS};
use crate::types::{CollectionInput, CollectionRecord, LibraryDocument, QaPair, QaStatus};

use super::database::{DatabaseProvider, QaPairChanges};

/// In-memory database over a shared [`MemoryStore`]
pub struct MemoryDatabase {
    store: Arc<MemoryStore>,
}

impl MemoryDatabase {
    /// Wrap an existing store
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Create a database over freshly seeded demo data
    pub fn seeded() -> Result<Self> {
        Ok(Self::new(Arc::new(MemoryStore::seeded()?)))
    }

    /// Get underlying store for direct access
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    fn collection_exists(&self, id: &str) -> bool {
        self.store.find_one(COLLECTIONS, &Filter::by_id(id)).is_some()
    }
}

fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(record) => Ok(record),
        other => Err(Error::internal(format!(
            "Expected a JSON object record, got {}",
            other
        ))),
    }
}

fn from_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

fn from_records<T: DeserializeOwned>(records: Vec<Record>) -> Result<Vec<T>> {
    records.into_iter().map(from_record).collect()
}

#[async_trait]
impl DatabaseProvider for MemoryDatabase {
    async fn list_collections(&self) -> Result<Vec<CollectionRecord>> {
        from_records(self.store.find_all(COLLECTIONS, &Filter::new()))
    }

    async fn get_collection(&self, id: &str) -> Result<CollectionRecord> {
        let record = self
            .store
            .find_one(COLLECTIONS, &Filter::by_id(id))
            .ok_or_else(|| Error::CollectionNotFound(id.to_string()))?;
        from_record(record)
    }

    async fn create_collection(&self, collection: CollectionRecord) -> Result<CollectionRecord> {
        let record = self.store.insert_one(COLLECTIONS, to_record(&collection)?);
        tracing::info!("Created collection {} ({})", collection.id, collection.name);
        from_record(record)
    }

    async fn update_collection(
        &self,
        id: &str,
        input: CollectionInput,
    ) -> Result<CollectionRecord> {
        let mut changes = Record::new();
        changes.insert("name".to_string(), Value::String(input.name));
        changes.insert(
            "description".to_string(),
            input.description.map_or(Value::Null, Value::String),
        );
        changes.insert("tags".to_string(), serde_json::to_value(input.tags)?);
        changes.insert(
            "metadata".to_string(),
            Value::Object(input.metadata.unwrap_or_default()),
        );

        let record = self
            .store
            .update_one(COLLECTIONS, &Filter::by_id(id), changes)
            .ok_or_else(|| Error::CollectionNotFound(id.to_string()))?;
        tracing::info!("Updated collection {}", id);
        from_record(record)
    }

    async fn delete_collection(&self, id: &str) -> Result<(CollectionRecord, usize)> {
        let collection = self.get_collection(id).await?;

        let removed = self
            .store
            .delete_many(QA_PAIRS, &Filter::new().eq("collection_id", id));
        if !self.store.delete_one(COLLECTIONS, &Filter::by_id(id)) {
            return Err(Error::CollectionNotFound(id.to_string()));
        }

        tracing::info!("Deleted collection {} and {} QA pairs", id, removed);
        Ok((collection, removed))
    }

    async fn list_qa_pairs(
        &self,
        collection_id: &str,
        status: Option<QaStatus>,
    ) -> Result<Vec<QaPair>> {
        if !self.collection_exists(collection_id) {
            return Err(Error::CollectionNotFound(collection_id.to_string()));
        }

        let mut filter = Filter::new().eq("collection_id", collection_id);
        if let Some(status) = status {
            filter = filter.eq("status", status.as_str());
        }

        let pairs = from_records(self.store.find_all(QA_PAIRS, &filter))?;
        tracing::debug!("Found {} QA pairs in collection {}", pairs.len(), collection_id);
        Ok(pairs)
    }

    async fn get_qa_pair(&self, collection_id: &str, qa_id: &str) -> Result<QaPair> {
        let record = self
            .store
            .find_one(
                QA_PAIRS,
                &Filter::by_id(qa_id).eq("collection_id", collection_id),
            )
            .ok_or_else(|| Error::QaPairNotFound(qa_id.to_string()))?;
        from_record(record)
    }

    async fn find_qa_pair(&self, qa_id: &str) -> Result<QaPair> {
        let record = self
            .store
            .find_one(QA_PAIRS, &Filter::by_id(qa_id))
            .ok_or_else(|| Error::QaPairNotFound(qa_id.to_string()))?;
        from_record(record)
    }

    async fn add_qa_pair(&self, pair: QaPair) -> Result<QaPair> {
        if !self.collection_exists(&pair.collection_id) {
            return Err(Error::CollectionNotFound(pair.collection_id));
        }

        let record = self.store.insert_one(QA_PAIRS, to_record(&pair)?);
        tracing::info!("Added QA pair {} to collection {}", pair.id, pair.collection_id);
        from_record(record)
    }

    async fn update_qa_pair(&self, qa_id: &str, changes: QaPairChanges) -> Result<QaPair> {
        let mut record = Record::new();
        if let Some(question) = changes.question {
            record.insert("question".to_string(), Value::String(question));
        }
        if let Some(answer) = changes.answer {
            record.insert("answer".to_string(), Value::String(answer));
        }
        if let Some(documents) = changes.documents {
            record.insert("documents".to_string(), serde_json::to_value(documents)?);
        }
        if let Some(status) = changes.status {
            record.insert("status".to_string(), Value::String(status.as_str().to_string()));
        }
        if let Some(metadata) = changes.metadata {
            record.insert("metadata".to_string(), Value::Object(metadata));
        }

        let updated = self
            .store
            .update_one(QA_PAIRS, &Filter::by_id(qa_id), record)
            .ok_or_else(|| Error::QaPairNotFound(qa_id.to_string()))?;
        tracing::info!("Updated QA pair {}", qa_id);
        from_record(updated)
    }

    async fn delete_qa_pair(&self, collection_id: &str, qa_id: &str) -> Result<()> {
        if !self.collection_exists(collection_id) {
            return Err(Error::CollectionNotFound(collection_id.to_string()));
        }

        let filter = Filter::by_id(qa_id).eq("collection_id", collection_id);
        if !self.store.delete_one(QA_PAIRS, &filter) {
            return Err(Error::QaPairNotFound(qa_id.to_string()));
        }

        tracing::info!("Deleted QA pair {} from collection {}", qa_id, collection_id);
        Ok(())
    }

    async fn list_documents(&self) -> Result<Vec<LibraryDocument>> {
        from_records(self.store.find_all(DOCUMENTS, &Filter::new()))
    }

    async fn get_document(&self, id: &str) -> Result<LibraryDocument> {
        let record = self
            .store
            .find_one(DOCUMENTS, &Filter::by_id(id))
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        from_record(record)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metadata, QaPairCreate};
    use chrono::Utc;

    fn database() -> MemoryDatabase {
        MemoryDatabase::seeded().unwrap()
    }

    fn new_pair(id: &str, collection_id: &str) -> QaPair {
        QaPair::from_create(
            id.to_string(),
            collection_id,
            QaPairCreate::new("How often is the filter replaced?", "Every 500 hours."),
            "demo_user",
        )
    }

    #[tokio::test]
    async fn test_seeded_collections() {
        let db = database();

        let collections = db.list_collections().await.unwrap();
        let ids: Vec<&str> = collections.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["col1", "col2", "col3"]);

        let col2 = db.get_collection("col2").await.unwrap();
        assert_eq!(col2.name, "SAP Notifications");
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let db = database();

        assert!(matches!(
            db.get_collection("nope").await,
            Err(Error::CollectionNotFound(_))
        ));
        assert!(matches!(
            db.list_qa_pairs("nope", None).await,
            Err(Error::CollectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_and_update_collection() {
        let db = database();
        let now = Utc::now();
        let created = db
            .create_collection(CollectionRecord {
                id: "col-new".to_string(),
                name: "New".to_string(),
                description: Some("desc".to_string()),
                tags: vec!["a".to_string()],
                metadata: Metadata::new(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        assert_eq!(created.id, "col-new");

        let mut input = CollectionInput::new("Renamed");
        input.tags = vec!["b".to_string()];
        let updated = db.update_collection("col-new", input).await.unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.description, None);
        assert_eq!(updated.tags, vec!["b"]);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_status_filter() {
        let db = database();

        let revisions = db
            .list_qa_pairs("col1", Some(QaStatus::RevisionRequested))
            .await
            .unwrap();
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].id, "qa6");

        let all = db.list_qa_pairs("col1", None).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_add_qa_pair_checks_collection() {
        let db = database();

        let result = db.add_qa_pair(new_pair("qa-x", "missing")).await;
        assert!(matches!(result, Err(Error::CollectionNotFound(_))));

        let added = db.add_qa_pair(new_pair("qa-y", "col3")).await.unwrap();
        assert_eq!(added.status, QaStatus::ReadyForReview);
        assert_eq!(db.list_qa_pairs("col3", None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_cascade_delete() {
        let db = database();

        let (deleted, removed) = db.delete_collection("col1").await.unwrap();
        assert_eq!(deleted.id, "col1");
        assert_eq!(removed, 4);

        assert!(matches!(
            db.find_qa_pair("qa1").await,
            Err(Error::QaPairNotFound(_))
        ));
        assert_eq!(db.store().count(QA_PAIRS), 4);
        assert!(db.delete_collection("col1").await.is_err());
    }

    #[tokio::test]
    async fn test_update_qa_pair() {
        let db = database();

        let updated = db
            .update_qa_pair(
                "qa2",
                QaPairChanges {
                    status: Some(QaStatus::Approved),
                    answer: Some("Quarterly.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, "qa2");
        assert_eq!(updated.status, QaStatus::Approved);
        assert_eq!(updated.answer, "Quarterly.");
        assert_eq!(updated.question, "What are the maintenance intervals?");
        assert!(matches!(
            db.update_qa_pair("nope", QaPairChanges::default()).await,
            Err(Error::QaPairNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_qa_pair_requires_matching_collection() {
        let db = database();

        assert!(matches!(
            db.delete_qa_pair("col2", "qa1").await,
            Err(Error::QaPairNotFound(_))
        ));
        assert!(matches!(
            db.delete_qa_pair("nope", "qa1").await,
            Err(Error::CollectionNotFound(_))
        ));
        db.delete_qa_pair("col1", "qa1").await.unwrap();
        assert!(db.get_qa_pair("col1", "qa1").await.is_err());
    }

    #[tokio::test]
    async fn test_library_documents() {
        let db = database();

        let documents = db.list_documents().await.unwrap();
        assert_eq!(documents.len(), 5);

        let doc3 = db.get_document("doc3").await.unwrap();
        assert_eq!(doc3.document.title, "SAP User Guide");
        assert_eq!(
            doc3.document.source.as_ref().map(|s| s.source_type.as_str()),
            Some("user_guide")
        );
        assert!(matches!(
            db.get_document("doc99").await,
            Err(Error::DocumentNotFound(_))
        ));
    }
}
