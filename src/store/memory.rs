//! In-process [`DocumentStore`] used by `JOKKA_STORE=memory` and the tests.
//!
//! Filters are plain field equality, which is all the services issue. Every
//! lookup is recorded so callers can assert which queries ran.

use std::collections::HashMap;

use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    pub collection: String,
    pub filter: Document,
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    queries: RwLock<Vec<QueryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn queries(&self) -> Vec<QueryRecord> {
        self.queries.read().await.clone()
    }

    pub async fn query_count(&self, collection: &str) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|record| record.collection == collection)
            .count()
    }

    async fn record(&self, collection: &str, filter: &Document) {
        self.queries.write().await.push(QueryRecord {
            collection: collection.to_string(),
            filter: filter.clone(),
        });
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn id_of(document: &Document) -> Option<ObjectId> {
    document.get("_id").and_then(Bson::as_object_id)
}

#[rocket::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<ObjectId> {
        let id = match document.get("_id") {
            None => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
            Some(Bson::ObjectId(id)) => *id,
            Some(_) => return Err(StoreError::UnexpectedId),
        };

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        self.record(collection, &filter).await;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| matches(document, &filter)))
            .cloned())
    }

    async fn find(&self, collection: &str, filter: Document) -> StoreResult<Vec<Document>> {
        self.record(collection, &filter).await;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches(document, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, collection: &str, id: ObjectId, set: Document) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| id_of(document) == Some(id)));

        match target {
            Some(document) => {
                for (key, value) in set {
                    document.insert(key, value);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: ObjectId) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = documents.len();
        documents.retain(|document| id_of(document) != Some(id));
        Ok(documents.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn insert_assigns_id_and_find_filters_by_equality() {
        let store = MemoryStore::new();
        let first = store
            .insert("events", doc! { "title": "Festival", "status": "published" })
            .await
            .unwrap();
        store
            .insert("events", doc! { "title": "Workshop", "status": "draft" })
            .await
            .unwrap();

        let published = store.find("events", doc! { "status": "published" }).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].get_object_id("_id").unwrap(), first);

        let everything = store.find("events", doc! {}).await.unwrap();
        assert_eq!(everything.len(), 2);
        assert!(store.find("places", doc! {}).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_sets_fields_and_reports_matches() {
        let store = MemoryStore::new();
        let id = store.insert("eos", doc! { "status": "pending_verification" }).await.unwrap();

        assert!(store.update("eos", id, doc! { "status": "verified" }).await.unwrap());
        assert!(!store.update("eos", ObjectId::new(), doc! { "status": "verified" }).await.unwrap());

        let stored = store.find_one("eos", doc! { "_id": id }).await.unwrap().unwrap();
        assert_eq!(stored.get_str("status").unwrap(), "verified");
    }

    #[tokio::test]
    async fn delete_removes_only_the_matching_document() {
        let store = MemoryStore::new();
        let keep = store.insert("wishlists", doc! { "itemId": "a" }).await.unwrap();
        let drop = store.insert("wishlists", doc! { "itemId": "b" }).await.unwrap();

        assert!(store.delete("wishlists", drop).await.unwrap());
        assert!(!store.delete("wishlists", drop).await.unwrap());

        let remaining = store.find("wishlists", doc! {}).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get_object_id("_id").unwrap(), keep);
    }

    #[tokio::test]
    async fn lookups_are_recorded_per_collection() {
        let store = MemoryStore::new();
        store.find("events", doc! { "organizerId": "x" }).await.unwrap();
        store.find_one("users", doc! { "email": "a@b.c" }).await.unwrap();

        assert_eq!(store.query_count("events").await, 1);
        assert_eq!(store.query_count("transactions").await, 0);
        assert_eq!(store.queries().await[1].filter, doc! { "email": "a@b.c" });
    }
}
