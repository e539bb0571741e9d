//! Collection types
//!
//! A collection is persisted as a [`CollectionRecord`]. The statistics on a
//! [`Collection`] are tallied from the QA pairs every time it is read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Metadata, QaPair, QaStatus};

/// Number of questions included in `sample_questions` on the list endpoint
pub const SAMPLE_QUESTION_COUNT: usize = 3;

/// Collection fields as stored by the database provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Collection as returned by the API, with derived statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    #[serde(flatten)]
    pub record: CollectionRecord,
    /// Number of QA pairs in the collection
    pub document_count: usize,
    /// QA pair count per status
    pub status_counts: BTreeMap<QaStatus, usize>,
    /// First few questions, only populated on the list endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_questions: Option<Vec<String>>,
}

impl Collection {
    /// Attach freshly computed statistics to a stored record
    pub fn with_stats(record: CollectionRecord, qa_pairs: &[QaPair]) -> Self {
        let mut status_counts = BTreeMap::new();
        for pair in qa_pairs {
            *status_counts.entry(pair.status).or_insert(0) += 1;
        }

        Self {
            record,
            document_count: qa_pairs.len(),
            status_counts,
            sample_questions: None,
        }
    }

    /// Add the first [`SAMPLE_QUESTION_COUNT`] questions
    pub fn with_samples(mut self, qa_pairs: &[QaPair]) -> Self {
        self.sample_questions = Some(
            qa_pairs
                .iter()
                .take(SAMPLE_QUESTION_COUNT)
                .map(|pair| pair.question.clone())
                .collect(),
        );
        self
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }
}

/// Body of `POST /collections` and `PUT /collections/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl CollectionInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tags: Vec::new(),
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QaPairCreate;

    fn record() -> CollectionRecord {
        let now = Utc::now();
        CollectionRecord {
            id: "col9".to_string(),
            name: "Manuals".to_string(),
            description: None,
            tags: vec![],
            metadata: Metadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn pair(question: &str, status: QaStatus) -> QaPair {
        let mut create = QaPairCreate::new(question, "answer");
        create.status = Some(status);
        QaPair::from_create("qa".to_string(), "col9", create, "demo_user")
    }

    #[test]
    fn test_stats_tally() {
        let pairs = vec![
            pair("a?", QaStatus::Approved),
            pair("b?", QaStatus::Approved),
            pair("c?", QaStatus::Rejected),
            pair("d?", QaStatus::ReadyForReview),
        ];

        let collection = Collection::with_stats(record(), &pairs).with_samples(&pairs);

        assert_eq!(collection.document_count, 4);
        assert_eq!(collection.status_counts[&QaStatus::Approved], 2);
        assert_eq!(collection.status_counts[&QaStatus::Rejected], 1);
        assert!(!collection.status_counts.contains_key(&QaStatus::RevisionRequested));
        assert_eq!(
            collection.sample_questions.as_deref(),
            Some(&["a?".to_string(), "b?".to_string(), "c?".to_string()][..])
        );
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let collection = Collection::with_stats(record(), &[pair("q", QaStatus::Approved)]);
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["id"], "col9");
        assert_eq!(json["document_count"], 1);
        assert_eq!(json["status_counts"]["approved"], 1);
        assert!(json.get("sample_questions").is_none());
    }
}
