//! In-memory table store
//!
//! Named tables of JSON records kept in insertion order. Each primitive takes
//! the lock once, so single calls are atomic but sequences of calls are not.

use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;

/// Table of collections
pub const COLLECTIONS: &str = "collections";
/// Table of QA pairs
pub const QA_PAIRS: &str = "qa_pairs";
/// Table of library documents
pub const DOCUMENTS: &str = "documents";

/// A stored record
pub type Record = serde_json::Map<String, Value>;

const SEED: &str = include_str!("seed.json");

/// Equality filter over top-level record fields
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Filter matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the `id` field
    pub fn by_id(id: &str) -> Self {
        Self::new().eq("id", id)
    }

    /// Add a `key == value` condition
    pub fn eq(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// True when every condition's key is present with an equal value
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(key, value)| record.get(key) == Some(value))
    }
}

/// Shared in-memory tables
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store loaded with the demo collections, QA pairs and documents
    pub fn seeded() -> Result<Self> {
        let tables: HashMap<String, Vec<Record>> = serde_json::from_str(SEED)?;
        tracing::debug!(
            "Seeded memory store with {} collections, {} QA pairs, {} documents",
            tables.get(COLLECTIONS).map_or(0, Vec::len),
            tables.get(QA_PAIRS).map_or(0, Vec::len),
            tables.get(DOCUMENTS).map_or(0, Vec::len),
        );
        Ok(Self::from_tables(tables))
    }

    /// Create a store from existing tables
    pub fn from_tables(tables: HashMap<String, Vec<Record>>) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Number of records in a table
    pub fn count(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, Vec::len)
    }

    /// All matching records, in insertion order
    pub fn find_all(&self, table: &str, filter: &Filter) -> Vec<Record> {
        self.tables
            .read()
            .get(table)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| filter.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First matching record; an empty filter matches nothing here
    pub fn find_one(&self, table: &str, filter: &Filter) -> Option<Record> {
        if filter.is_empty() {
            return None;
        }
        self.tables
            .read()
            .get(table)?
            .iter()
            .find(|record| filter.matches(record))
            .cloned()
    }

    /// Append a record, generating an id when it has none and stamping timestamps
    pub fn insert_one(&self, table: &str, mut record: Record) -> Record {
        let mut tables = self.tables.write();
        let records = tables.entry(table.to_string()).or_default();

        if !record.contains_key("id") {
            record.insert(
                "id".to_string(),
                Value::String(format!("{}_{}", table, records.len() + 1)),
            );
        }
        let now = timestamp();
        record.insert("created_at".to_string(), now.clone());
        record.insert("updated_at".to_string(), now);

        records.push(record.clone());
        record
    }

    /// Merge `changes` into the first matching record
    ///
    /// The `id` field is never overwritten and `updated_at` is refreshed.
    pub fn update_one(&self, table: &str, filter: &Filter, changes: Record) -> Option<Record> {
        if filter.is_empty() {
            return None;
        }
        let mut tables = self.tables.write();
        let record = tables
            .get_mut(table)?
            .iter_mut()
            .find(|record| filter.matches(record))?;

        for (key, value) in changes {
            if key != "id" {
                record.insert(key, value);
            }
        }
        record.insert("updated_at".to_string(), timestamp());

        Some(record.clone())
    }

    /// Remove the first matching record
    pub fn delete_one(&self, table: &str, filter: &Filter) -> bool {
        if filter.is_empty() {
            return false;
        }
        let mut tables = self.tables.write();
        let Some(records) = tables.get_mut(table) else {
            return false;
        };
        match records.iter().position(|record| filter.matches(record)) {
            Some(index) => {
                records.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every matching record, returning how many were removed
    pub fn delete_many(&self, table: &str, filter: &Filter) -> usize {
        let mut tables = self.tables.write();
        let Some(records) = tables.get_mut(table) else {
            return 0;
        };
        let before = records.len();
        records.retain(|record| !filter.matches(record));
        before - records.len()
    }
}

fn timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_seeded_tables() {
        let store = MemoryStore::seeded().unwrap();

        assert_eq!(store.count(COLLECTIONS), 3);
        assert_eq!(store.count(QA_PAIRS), 8);
        assert_eq!(store.count(DOCUMENTS), 5);
    }

    #[test]
    fn test_filter_requires_every_key() {
        let store = MemoryStore::seeded().unwrap();

        let col1 = store.find_all(QA_PAIRS, &Filter::new().eq("collection_id", "col1"));
        assert_eq!(col1.len(), 4);

        let approved = store.find_all(
            QA_PAIRS,
            &Filter::new()
                .eq("collection_id", "col1")
                .eq("status", "approved"),
        );
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0]["id"], "qa1");

        let missing_key = store.find_all(QA_PAIRS, &Filter::new().eq("nonexistent", 1));
        assert!(missing_key.is_empty());
    }

    #[test]
    fn test_empty_filter() {
        let store = MemoryStore::seeded().unwrap();

        assert_eq!(store.find_all(COLLECTIONS, &Filter::new()).len(), 3);
        assert!(store.find_one(COLLECTIONS, &Filter::new()).is_none());
    }

    #[test]
    fn test_insert_generates_id_and_timestamps() {
        let store = MemoryStore::new();

        let first = store.insert_one("notes", record(json!({"text": "a"})));
        let second = store.insert_one("notes", record(json!({"id": "custom", "text": "b"})));

        assert_eq!(first["id"], "notes_1");
        assert_eq!(second["id"], "custom");
        assert!(first.contains_key("created_at"));
        assert_eq!(first["created_at"], first["updated_at"]);
        assert_eq!(store.count("notes"), 2);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let store = MemoryStore::seeded().unwrap();
        let before = store.find_one(COLLECTIONS, &Filter::by_id("col2")).unwrap();

        let updated = store
            .update_one(
                COLLECTIONS,
                &Filter::by_id("col2"),
                record(json!({"id": "hijack", "name": "Renamed"})),
            )
            .unwrap();

        assert_eq!(updated["id"], "col2");
        assert_eq!(updated["name"], "Renamed");
        assert_eq!(updated["created_at"], before["created_at"]);
        assert_ne!(updated["updated_at"], before["updated_at"]);
        assert!(store
            .update_one(COLLECTIONS, &Filter::by_id("nope"), Record::new())
            .is_none());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::seeded().unwrap();

        assert!(store.delete_one(COLLECTIONS, &Filter::by_id("col3")));
        assert!(!store.delete_one(COLLECTIONS, &Filter::by_id("col3")));
        assert_eq!(
            store.delete_many(QA_PAIRS, &Filter::new().eq("collection_id", "col1")),
            4
        );
        assert_eq!(store.count(QA_PAIRS), 4);
        assert_eq!(store.delete_many("missing", &Filter::new()), 0);
    }
}
