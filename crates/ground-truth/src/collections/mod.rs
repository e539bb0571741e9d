//! Collection and QA pair management
//!
//! Sits between the HTTP routes and the database provider: attaches derived
//! statistics on every read, validates writes and applies the review
//! workflow rules for QA pair updates.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::{DatabaseProvider, QaPairChanges};
use crate::types::{
    Collection, CollectionInput, CollectionRecord, Metadata, QaPair, QaPairCreate, QaPairUpdate,
    QaStatus,
};

/// Metadata keys holding the active revision request
const REVISION_KEYS: [&str; 4] = [
    "revision_feedback",
    "revision_comments",
    "revision_requested_by",
    "revision_requested_at",
];

/// Collection and QA pair operations over a database provider
#[derive(Clone)]
pub struct CollectionService {
    database: Arc<dyn DatabaseProvider>,
}

impl CollectionService {
    pub fn new(database: Arc<dyn DatabaseProvider>) -> Self {
        Self { database }
    }

    async fn with_stats(&self, record: CollectionRecord) -> Result<Collection> {
        let pairs = self.database.list_qa_pairs(&record.id, None).await?;
        Ok(Collection::with_stats(record, &pairs))
    }

    /// Every collection with statistics and sample questions
    pub async fn list_collections(&self) -> Result<Vec<Collection>> {
        let records = self.database.list_collections().await?;
        let mut collections = Vec::with_capacity(records.len());

        for record in records {
            let id = record.id.clone();
            match self.database.list_qa_pairs(&id, None).await {
                Ok(pairs) => {
                    collections.push(Collection::with_stats(record, &pairs).with_samples(&pairs))
                }
                // Deleted by a concurrent request since the listing
                Err(Error::CollectionNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        tracing::debug!("Listed {} collections", collections.len());
        Ok(collections)
    }

    /// One collection with fresh statistics
    pub async fn get_collection(&self, id: &str) -> Result<Collection> {
        let record = self.database.get_collection(id).await?;
        self.with_stats(record).await
    }

    /// Create an empty collection
    pub async fn create_collection(&self, input: CollectionInput) -> Result<Collection> {
        let name = validate_name(&input.name)?;
        let now = Utc::now();

        let record = CollectionRecord {
            id: Uuid::new_v4().to_string(),
            name,
            description: input.description,
            tags: input.tags,
            metadata: input.metadata.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.database.create_collection(record).await?;
        Ok(Collection::with_stats(stored, &[]))
    }

    /// Replace name, description, tags and metadata
    pub async fn update_collection(
        &self,
        id: &str,
        mut input: CollectionInput,
    ) -> Result<Collection> {
        input.name = validate_name(&input.name)?;
        let record = self.database.update_collection(id, input).await?;
        self.with_stats(record).await
    }

    /// Delete a collection and its QA pairs
    pub async fn delete_collection(&self, id: &str) -> Result<()> {
        let (_, removed) = self.database.delete_collection(id).await?;
        tracing::debug!("Cascade removed {} QA pairs with collection {}", removed, id);
        Ok(())
    }

    /// QA pairs of a collection, optionally filtered by status
    pub async fn list_qa_pairs(
        &self,
        collection_id: &str,
        status: Option<&str>,
    ) -> Result<Vec<QaPair>> {
        let status = status.map(str::parse::<QaStatus>).transpose()?;
        self.database.list_qa_pairs(collection_id, status).await
    }

    /// Add a QA pair to an existing collection
    pub async fn create_qa_pair(
        &self,
        collection_id: &str,
        create: QaPairCreate,
        created_by: &str,
    ) -> Result<QaPair> {
        let pair = QaPair::from_create(
            Uuid::new_v4().to_string(),
            collection_id,
            create,
            created_by,
        );
        self.database.add_qa_pair(pair).await
    }

    pub async fn get_qa_pair(&self, qa_id: &str) -> Result<QaPair> {
        self.database.find_qa_pair(qa_id).await
    }

    /// Apply a partial update
    ///
    /// Metadata is merged key by key into the stored metadata. Approving a
    /// pair that carries revision feedback moves that feedback into
    /// `metadata.revision_history`.
    pub async fn update_qa_pair(&self, qa_id: &str, update: QaPairUpdate) -> Result<QaPair> {
        let existing = self.database.find_qa_pair(qa_id).await?;
        let status = update
            .status
            .as_deref()
            .map(str::parse::<QaStatus>)
            .transpose()?;

        let mut metadata = update.metadata.map(|patch| {
            let mut merged = existing.metadata.clone();
            merged.extend(patch);
            merged
        });

        if status == Some(QaStatus::Approved) && has_revision_feedback(&existing.metadata) {
            let merged = metadata.get_or_insert_with(|| existing.metadata.clone());
            archive_revision_feedback(&existing.metadata, merged);
            tracing::info!("Archived revision feedback for approved QA pair {}", qa_id);
        }

        let changes = QaPairChanges {
            question: update.question,
            answer: update.answer,
            documents: update.documents,
            status,
            metadata,
        };
        self.database.update_qa_pair(qa_id, changes).await
    }

    /// Delete a QA pair from a collection
    pub async fn delete_qa_pair(&self, collection_id: &str, qa_id: &str) -> Result<()> {
        self.database.delete_qa_pair(collection_id, qa_id).await
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Collection name must not be empty"));
    }
    Ok(name.to_string())
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

fn has_revision_feedback(metadata: &Metadata) -> bool {
    is_truthy(metadata.get("revision_feedback")) || is_truthy(metadata.get("revision_comments"))
}

/// Append the active revision request of `existing` to the history in
/// `merged` and drop the active revision keys from `merged`
fn archive_revision_feedback(existing: &Metadata, merged: &mut Metadata) {
    let feedback = if is_truthy(existing.get("revision_feedback")) {
        existing.get("revision_feedback")
    } else {
        existing.get("revision_comments")
    };
    let field = |key: &str| existing.get(key).cloned().unwrap_or(Value::Null);

    let entry = json!({
        "revision_feedback": feedback.cloned().unwrap_or(Value::Null),
        "revision_requested_by": field("revision_requested_by"),
        "revision_requested_at": field("revision_requested_at"),
        "archived_on_approval_by": merged
            .get("approved_by")
            .cloned()
            .unwrap_or_else(|| Value::String("system".to_string())),
        "archived_on_approval_at": merged
            .get("approved_at")
            .cloned()
            .unwrap_or_else(|| {
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
            }),
        "archive_reason": "moved_to_history_on_approval",
    });

    let history = merged
        .entry("revision_history")
        .or_insert_with(|| Value::Array(Vec::new()));
    match history {
        Value::Array(entries) => entries.push(entry),
        other => *other = Value::Array(vec![entry]),
    }

    for key in REVISION_KEYS {
        merged.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryDatabase;

    fn service() -> CollectionService {
        CollectionService::new(Arc::new(MemoryDatabase::seeded().unwrap()))
    }

    fn metadata(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_list_collections_with_stats() {
        let service = service();

        let collections = service.list_collections().await.unwrap();
        assert_eq!(collections.len(), 3);

        let col1 = &collections[0];
        assert_eq!(col1.id(), "col1");
        assert_eq!(col1.document_count, 4);
        assert_eq!(col1.status_counts[&QaStatus::Approved], 1);
        assert_eq!(col1.status_counts[&QaStatus::ReadyForReview], 1);
        assert_eq!(col1.status_counts[&QaStatus::Rejected], 1);
        assert_eq!(col1.status_counts[&QaStatus::RevisionRequested], 1);
        assert_eq!(col1.sample_questions.as_ref().unwrap().len(), 3);

        let total: usize = collections.iter().map(|c| c.document_count).sum();
        assert_eq!(total, 8);
    }

    #[tokio::test]
    async fn test_stats_track_writes() {
        let service = service();

        let pair = service
            .create_qa_pair("col3", QaPairCreate::new("New?", "Yes."), "user_1")
            .await
            .unwrap();
        assert_eq!(pair.created_by, "user_1");
        assert_eq!(pair.status, QaStatus::ReadyForReview);

        let col3 = service.get_collection("col3").await.unwrap();
        assert_eq!(col3.document_count, 3);
        assert_eq!(col3.status_counts[&QaStatus::ReadyForReview], 1);
        assert!(col3.sample_questions.is_none());

        service.delete_qa_pair("col3", &pair.id).await.unwrap();
        assert_eq!(service.get_collection("col3").await.unwrap().document_count, 2);
    }

    #[tokio::test]
    async fn test_collection_crud() {
        let service = service();

        let mut input = CollectionInput::new("  Field Reports ");
        input.tags = vec!["field".to_string()];
        let created = service.create_collection(input).await.unwrap();
        assert_eq!(created.record.name, "Field Reports");
        assert_eq!(created.document_count, 0);
        assert!(created.status_counts.is_empty());
        assert!(Uuid::parse_str(created.id()).is_ok());

        let fetched = service.get_collection(created.id()).await.unwrap();
        assert_eq!(fetched.record, created.record);

        let mut update = CollectionInput::new("Reports");
        update.metadata = Some(metadata(json!({"owner": "ops"})));
        let updated = service.update_collection(created.id(), update).await.unwrap();
        assert_eq!(updated.record.name, "Reports");
        assert!(updated.record.tags.is_empty());
        assert_eq!(updated.record.metadata["owner"], "ops");

        service.delete_collection(created.id()).await.unwrap();
        assert!(matches!(
            service.get_collection(created.id()).await,
            Err(Error::CollectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let service = service();

        let result = service.create_collection(CollectionInput::new("   ")).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_cascade_delete() {
        let service = service();

        service.delete_collection("col2").await.unwrap();
        assert!(matches!(
            service.get_qa_pair("qa3").await,
            Err(Error::QaPairNotFound(_))
        ));
        assert!(matches!(
            service.list_qa_pairs("col2", None).await,
            Err(Error::CollectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_qa_pair_requires_collection() {
        let service = service();

        let result = service
            .create_qa_pair("missing", QaPairCreate::new("Q", "A"), "demo_user")
            .await;
        assert!(matches!(result, Err(Error::CollectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_status_filter_validation() {
        let service = service();

        let approved = service.list_qa_pairs("col1", Some("approved")).await.unwrap();
        assert_eq!(approved.len(), 1);

        let invalid = service.list_qa_pairs("col1", Some("pending")).await;
        assert!(matches!(invalid, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_status() {
        let service = service();

        let update = QaPairUpdate {
            status: Some("published".to_string()),
            ..Default::default()
        };
        let err = service.update_qa_pair("qa1", update).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("revision_requested"));
    }

    #[tokio::test]
    async fn test_metadata_is_merged() {
        let service = service();

        let update = QaPairUpdate {
            answer: Some("Hold the reset button for 10 seconds.".to_string()),
            metadata: Some(metadata(json!({"reviewer": "user_2"}))),
            ..Default::default()
        };
        let updated = service.update_qa_pair("qa1", update).await.unwrap();

        assert_eq!(updated.metadata["priority"], "high");
        assert_eq!(updated.metadata["reviewer"], "user_2");
        assert_eq!(updated.answer, "Hold the reset button for 10 seconds.");
        assert_eq!(updated.status, QaStatus::Approved);
    }

    #[tokio::test]
    async fn test_approval_archives_revision_feedback() {
        let service = service();

        let update = QaPairUpdate {
            status: Some("approved".to_string()),
            metadata: Some(metadata(json!({
                "approved_by": "user_2",
                "approved_at": "2024-01-01T00:00:00Z"
            }))),
            ..Default::default()
        };
        let updated = service.update_qa_pair("qa6", update).await.unwrap();

        assert_eq!(updated.status, QaStatus::Approved);
        assert!(!updated.metadata.contains_key("revision_comments"));
        assert_eq!(updated.metadata["priority"], "medium");

        let history = updated.metadata["revision_history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0]["revision_feedback"]
            .as_str()
            .unwrap()
            .starts_with("Please provide more details"));
        assert_eq!(history[0]["archived_on_approval_by"], "user_2");
        assert_eq!(history[0]["archived_on_approval_at"], "2024-01-01T00:00:00Z");
        assert_eq!(history[0]["archive_reason"], "moved_to_history_on_approval");
    }

    #[tokio::test]
    async fn test_approval_without_metadata_still_archives() {
        let service = service();

        let update = QaPairUpdate {
            status: Some("approved".to_string()),
            ..Default::default()
        };
        let updated = service.update_qa_pair("qa7", update).await.unwrap();

        let history = updated.metadata["revision_history"].as_array().unwrap();
        assert_eq!(history[0]["archived_on_approval_by"], "system");
        assert!(history[0]["archived_on_approval_at"].is_string());
        assert!(!updated.metadata.contains_key("revision_comments"));
    }

    #[tokio::test]
    async fn test_non_approval_keeps_feedback() {
        let service = service();

        let update = QaPairUpdate {
            status: Some("ready_for_review".to_string()),
            ..Default::default()
        };
        let updated = service.update_qa_pair("qa8", update).await.unwrap();

        assert!(updated.metadata.contains_key("revision_comments"));
        assert!(!updated.metadata.contains_key("revision_history"));
    }

    #[tokio::test]
    async fn test_update_missing_pair() {
        let service = service();

        let result = service.update_qa_pair("qa404", QaPairUpdate::default()).await;
        assert!(matches!(result, Err(Error::QaPairNotFound(_))));
    }
}
