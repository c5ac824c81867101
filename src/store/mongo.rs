use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use super::{DocumentStore, StoreError, StoreResult};
use crate::config::Config;

pub async fn init_db(config: &Config) -> StoreResult<Database> {
    let uri = config.mongodb_uri.as_deref().unwrap_or("mongodb://localhost:27017/jokka");
    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.app_name = Some("jokka".to_string());

    let client = Client::with_options(client_options)?;
    Ok(client.database(config.database_name()))
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        MongoStore { db }
    }

    pub async fn connect(config: &Config) -> StoreResult<Self> {
        Ok(MongoStore::new(init_db(config).await?))
    }
}

#[rocket::async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<ObjectId> {
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(document, None)
            .await?;
        result.inserted_id.as_object_id().ok_or(StoreError::UnexpectedId)
    }

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self
            .db
            .collection::<Document>(collection)
            .find_one(filter, None)
            .await?)
    }

    async fn find(&self, collection: &str, filter: Document) -> StoreResult<Vec<Document>> {
        let mut cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter, None)
            .await?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            documents.push(document);
        }
        Ok(documents)
    }

    async fn update(&self, collection: &str, id: ObjectId, set: Document) -> StoreResult<bool> {
        let result = self
            .db
            .collection::<Document>(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, id: ObjectId) -> StoreResult<bool> {
        let result = self
            .db
            .collection::<Document>(collection)
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }
}
