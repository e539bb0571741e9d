//! In-memory data source over a fixed set of sample documents
//!
//! Scoring, per document that passes the filters:
//! - whole query found in the title: 0.95
//! - whole query found in the content: 0.85
//! - otherwise term hits (terms longer than 2 chars, title hits weighted 3x):
//!   `min(0.8, 0.3 + 0.05 * weighted)`
//! - no hits at all: a stable baseline in `0.1..0.2` derived from the id
//!
//! Every document is returned, so a search never comes back empty.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::types::{Document, DocumentSource, Metadata};

use super::data_source::{DataSourceProvider, SourceFilters};

const SOURCE_ID: &str = "memory";
const SOURCE_NAME: &str = "Sample Documents";
const SOURCE_DESCRIPTION: &str = "A collection of sample documents for demonstration purposes";

const TITLE_MATCH_SCORE: f32 = 0.95;
const CONTENT_MATCH_SCORE: f32 = 0.85;
const TERM_MATCH_BASE: f32 = 0.3;
const TERM_MATCH_STEP: f32 = 0.05;
const TERM_MATCH_CAP: f32 = 0.8;
const TITLE_TERM_WEIGHT: usize = 3;
const MIN_TERM_LEN: usize = 3;

/// Data source holding the sample documents in memory
pub struct MemoryDataSource {
    documents: Vec<Document>,
}

impl Default for MemoryDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDataSource {
    /// Create a source over the built-in sample documents
    pub fn new() -> Self {
        Self::with_documents(sample_documents())
    }

    /// Create a source over arbitrary documents
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let source = DocumentSource::new(SOURCE_ID, SOURCE_NAME, "memory");
        let documents = documents
            .into_iter()
            .map(|mut doc| {
                doc.source = Some(source.clone());
                doc
            })
            .collect();
        Self { documents }
    }

    fn matches_filters(doc: &Document, filters: &SourceFilters) -> bool {
        filters.iter().all(|(key, expected)| {
            if let Some(meta_key) = key.strip_prefix("metadata.") {
                return doc.metadata.get(meta_key) == Some(expected);
            }
            match top_level_field(doc, key) {
                Some(actual) => &actual == expected,
                // Unknown fields do not exclude a document
                None => true,
            }
        })
    }

    /// Relevance of `doc` for an already lowercased query
    fn score(doc: &Document, query: &str, terms: &[&str]) -> f32 {
        let title = doc.title.to_lowercase();
        let content = doc.content.to_lowercase();

        if title.contains(query) {
            return TITLE_MATCH_SCORE;
        }
        if content.contains(query) {
            return CONTENT_MATCH_SCORE;
        }

        let title_hits: usize = terms.iter().map(|t| title.matches(t).count()).sum();
        let content_hits: usize = terms.iter().map(|t| content.matches(t).count()).sum();
        let weighted = title_hits * TITLE_TERM_WEIGHT + content_hits;

        if weighted > 0 {
            (TERM_MATCH_BASE + weighted as f32 * TERM_MATCH_STEP).min(TERM_MATCH_CAP)
        } else {
            baseline_score(&doc.id)
        }
    }
}

fn top_level_field(doc: &Document, key: &str) -> Option<Value> {
    match key {
        "id" => Some(Value::String(doc.id.clone())),
        "title" => Some(Value::String(doc.title.clone())),
        "content" => Some(Value::String(doc.content.clone())),
        "url" => doc.url.clone().map(Value::String),
        _ => None,
    }
}

/// Stable score in `0.1..0.2` so unmatched documents still vary
fn baseline_score(id: &str) -> f32 {
    let hash = id
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    0.1 + (hash % 100) as f32 / 1000.0
}

#[async_trait]
impl DataSourceProvider for MemoryDataSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn description(&self) -> &str {
        SOURCE_DESCRIPTION
    }

    async fn retrieve_documents(
        &self,
        query: &str,
        filters: &SourceFilters,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let query = query.to_lowercase();
        let terms: Vec<&str> = query
            .split_whitespace()
            .filter(|term| term.chars().count() >= MIN_TERM_LEN)
            .collect();

        let mut results: Vec<Document> = self
            .documents
            .iter()
            .filter(|doc| Self::matches_filters(doc, filters))
            .map(|doc| {
                let mut result = doc.clone();
                result.relevance_score = Some(Self::score(doc, &query, &terms));
                result
            })
            .collect();

        results.sort_by(|a, b| {
            let a = a.relevance_score.unwrap_or_default();
            let b = b.relevance_score.unwrap_or_default();
            b.total_cmp(&a)
        });
        results.truncate(limit);

        tracing::debug!(
            "Memory source returned {} documents for '{}'",
            results.len(),
            query
        );
        Ok(results)
    }

    async fn get_document(&self, id: &str) -> Result<Document> {
        self.documents
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
    }
}

fn sample_document(id: &str, title: &str, content: &str, url: &str, metadata: Value) -> Document {
    let metadata = match metadata {
        Value::Object(map) => map,
        _ => Metadata::new(),
    };
    Document {
        url: Some(url.to_string()),
        metadata,
        ..Document::new(id, title, content)
    }
}

fn sample_documents() -> Vec<Document> {
    vec![
        sample_document(
            "doc1",
            "Equipment Maintenance Manual",
            "Regular maintenance of equipment is essential for optimal performance. \
             This document outlines maintenance procedures for various equipment types.",
            "https://example.com/docs/equipment-manual.pdf",
            json!({
                "type": "manual",
                "topic": "maintenance",
                "equipment_type": "general",
                "created_date": "2023-01-15",
                "status": "approved"
            }),
        ),
        sample_document(
            "doc2",
            "Troubleshooting Guide: Air Filters",
            "Common issues with air filters include clogging, improper installation, \
             and insufficient airflow. This guide provides step-by-step troubleshooting \
             procedures for identifying and resolving air filter problems.",
            "https://example.com/docs/airfilter-guide.pdf",
            json!({
                "type": "guide",
                "topic": "troubleshooting",
                "component": "air filter",
                "created_date": "2023-03-22"
            }),
        ),
        sample_document(
            "doc3",
            "Safety Protocols for Equipment Operation",
            "Safety is paramount when operating industrial equipment. This document \
             covers essential safety protocols, including personal protective equipment, \
             pre-operation checks, and emergency procedures.",
            "https://example.com/docs/safety-protocols.pdf",
            json!({
                "type": "protocol",
                "topic": "safety",
                "importance": "critical",
                "created_date": "2023-05-10"
            }),
        ),
        sample_document(
            "doc4",
            "Technical Specifications: Model X Series",
            "Technical specifications for the Model X series include power requirements, \
             dimensional constraints, operating conditions, and performance metrics. \
             Reference this document when planning installations or upgrades.",
            "https://example.com/docs/model-x-specs.pdf",
            json!({
                "type": "specifications",
                "topic": "technical",
                "product": "Model X",
                "created_date": "2023-02-18"
            }),
        ),
        sample_document(
            "doc5",
            "AI Ground Truth Generation Best Practices",
            "Creating high-quality ground truth data is essential for training effective \
             AI models. This document covers best practices for data annotation, quality \
             control, and dataset management to ensure optimal model performance.",
            "https://example.com/docs/ai-ground-truth-best-practices.pdf",
            json!({
                "type": "guide",
                "topic": "ai",
                "subtopic": "data preparation",
                "created_date": "2023-06-15"
            }),
        ),
        sample_document(
            "doc6",
            "Data Annotation Guidelines for Machine Learning",
            "Proper data annotation is crucial for developing accurate machine learning models. \
             This document provides guidelines for consistent, high-quality annotations across \
             different data types including text, images, and audio.",
            "https://example.com/docs/data-annotation-guidelines.pdf",
            json!({
                "type": "guidelines",
                "topic": "data annotation",
                "subtopic": "machine learning",
                "created_date": "2023-07-20"
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn search(query: &str, limit: usize) -> Vec<Document> {
        MemoryDataSource::new()
            .retrieve_documents(query, &SourceFilters::new(), limit)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_title_match_ranks_first() {
        let results = search("Air Filters", 10).await;

        assert_eq!(results.len(), 6);
        assert_eq!(results[0].id, "doc2");
        assert_eq!(results[0].relevance_score, Some(0.95));
        assert_eq!(results[0].source.as_ref().unwrap().id, "memory");
    }

    #[tokio::test]
    async fn test_content_match_score() {
        let results = search("pre-operation checks", 1).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "doc3");
        assert_eq!(results[0].relevance_score, Some(0.85));
    }

    #[tokio::test]
    async fn test_term_match_score() {
        // "safety" once in the title, twice in the content; "on" is too short to count
        let results = search("safety on boats", 10).await;

        assert_eq!(results[0].id, "doc3");
        assert!((results[0].relevance_score.unwrap() - 0.55).abs() < 1e-6);

        let crowded = Document::new("y", "filter filter filter filter", "filter");
        let capped = MemoryDataSource::score(&crowded, "filter kit", &["filter", "kit"]);
        assert_eq!(capped, 0.8);

        let doc = Document::new("x", "Pump", "pump pump");
        let score = MemoryDataSource::score(&doc, "pump station", &["pump", "station"]);
        assert!((score - (0.3 + 5.0 * 0.05)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_no_match_baseline_is_stable() {
        let first = search("zzzz qqqq", 10).await;
        let second = search("zzzz qqqq", 10).await;

        assert_eq!(first.len(), 6);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.id, b.id);
            let score = a.relevance_score.unwrap();
            assert!((0.1..0.2).contains(&score));
            assert_eq!(a.relevance_score, b.relevance_score);
        }
    }

    #[tokio::test]
    async fn test_results_sorted_descending() {
        let results = search("equipment", 10).await;

        let scores: Vec<f32> = results.iter().map(|d| d.relevance_score.unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_filters() {
        let source = MemoryDataSource::new();

        let mut filters = SourceFilters::new();
        filters.insert("metadata.type".to_string(), json!("guide"));
        let guides = source.retrieve_documents("data", &filters, 10).await.unwrap();
        let mut ids: Vec<&str> = guides.iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["doc2", "doc5"]);

        let mut filters = SourceFilters::new();
        filters.insert("id".to_string(), json!("doc4"));
        filters.insert("unknown_field".to_string(), json!(1));
        let by_id = source.retrieve_documents("x", &filters, 10).await.unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, "doc4");
    }

    #[tokio::test]
    async fn test_get_document() {
        let source = MemoryDataSource::new();

        let doc = source.get_document("doc6").await.unwrap();
        assert_eq!(doc.title, "Data Annotation Guidelines for Machine Learning");
        assert_eq!(doc.source.unwrap().name, "Sample Documents");
        assert!(doc.relevance_score.is_none());
        assert!(matches!(
            source.get_document("doc7").await,
            Err(Error::DocumentNotFound(_))
        ));
    }
}
