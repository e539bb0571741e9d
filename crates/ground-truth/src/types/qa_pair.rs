//! QA pair types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Document, Metadata};
use crate::error::Error;

/// Created-by value used when the caller is anonymous
pub const ANONYMOUS_USER: &str = "demo_user";

/// Review status of a QA pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaStatus {
    /// Waiting for a reviewer
    #[default]
    ReadyForReview,
    /// Accepted as ground truth
    Approved,
    /// Sent back to the author with feedback
    RevisionRequested,
    /// Discarded
    Rejected,
}

impl QaStatus {
    pub const ALL: [QaStatus; 4] = [
        QaStatus::ReadyForReview,
        QaStatus::Approved,
        QaStatus::RevisionRequested,
        QaStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QaStatus::ReadyForReview => "ready_for_review",
            QaStatus::Approved => "approved",
            QaStatus::RevisionRequested => "revision_requested",
            QaStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for QaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QaStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QaStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = QaStatus::ALL.iter().map(QaStatus::as_str).collect();
                Error::validation(format!(
                    "Invalid status value. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// A question/answer pair with its reference documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub id: String,
    pub collection_id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub status: QaStatus,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_created_by")]
    pub created_by: String,
}

fn default_created_by() -> String {
    ANONYMOUS_USER.to_string()
}

impl QaPair {
    /// Build a new pair from a create request
    pub fn from_create(
        id: String,
        collection_id: &str,
        create: QaPairCreate,
        created_by: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            collection_id: collection_id.to_string(),
            question: create.question,
            answer: create.answer,
            documents: create.documents,
            status: create.status.unwrap_or_default(),
            metadata: create.metadata.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            created_by: created_by.to_string(),
        }
    }
}

/// Body of `POST /collections/:id/qa-pairs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaPairCreate {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub status: Option<QaStatus>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl QaPairCreate {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            documents: Vec::new(),
            status: None,
            metadata: None,
        }
    }
}

/// Body of `PATCH /collections/qa-pairs/:qa_id`
///
/// `status` stays a plain string so an unknown value is reported as a
/// validation error listing the accepted values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaPairUpdate {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub documents: Option<Vec<Document>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}
