//! Document persistence.
//!
//! Every collection is reached through [`DocumentStore`], a small set of
//! schema-less operations (insert, equality lookups, `$set` updates, delete by
//! id). [`Collection`] layers the typed model on top with `bson` conversion.

use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

pub type StoreResult<T> = Result<T, StoreError>;

pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),
    #[error("document `_id` is not an ObjectId")]
    UnexpectedId,
}

#[rocket::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document, generating an `_id` when the document has none.
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<ObjectId>;

    /// First document whose fields equal every field of `filter`.
    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>>;

    /// All documents whose fields equal every field of `filter`, in storage order.
    async fn find(&self, collection: &str, filter: Document) -> StoreResult<Vec<Document>>;

    /// Applies `set` as a `$set` on the document with the given id.
    /// Returns whether a document matched.
    async fn update(&self, collection: &str, id: ObjectId, set: Document) -> StoreResult<bool>;

    async fn delete(&self, collection: &str, id: ObjectId) -> StoreResult<bool>;
}

/// A persisted document type and the collection it lives in.
pub trait Model: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
}

/// Typed view over one collection of a [`DocumentStore`].
pub struct Collection<'a, T> {
    store: &'a dyn DocumentStore,
    _model: PhantomData<fn() -> T>,
}

pub fn collection<T: Model>(store: &dyn DocumentStore) -> Collection<'_, T> {
    Collection {
        store,
        _model: PhantomData,
    }
}

impl<'a, T: Model> Collection<'a, T> {
    pub async fn insert_one(&self, model: &T) -> StoreResult<ObjectId> {
        let document = bson::to_document(model)?;
        self.store.insert(T::COLLECTION, document).await
    }

    pub async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        match self.store.find_one(T::COLLECTION, filter).await? {
            Some(document) => Ok(Some(bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<T>> {
        self.find_one(doc! { "_id": id }).await
    }

    pub async fn find(&self, filter: Document) -> StoreResult<Vec<T>> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|document| bson::from_document(document).map_err(StoreError::from))
            .collect()
    }

    pub async fn update_by_id(&self, id: ObjectId, set: Document) -> StoreResult<bool> {
        self.store.update(T::COLLECTION, id, set).await
    }

    pub async fn delete_by_id(&self, id: ObjectId) -> StoreResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}
